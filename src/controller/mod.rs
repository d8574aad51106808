// controller - the per-request state machine behind every UI resource route
//
// AuthCheck (middleware::session) → Decode (decode) → Execute (execute) → Route (respond)

pub mod decode;
pub mod execute;
pub mod respond;

pub use decode::{decode_form, DecodeError, Submission, JSON_INPUT_FIELD};
pub use execute::Execution;
pub use respond::{decide, unauthenticated, Decision, Target, UiPaths};
