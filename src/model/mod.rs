pub mod user;

pub use user::User;

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};

use crate::client::{Client, Collection};

/// A backend-managed entity the UI can list, show, create and update.
///
/// `NAME` is both the URL segment under the UI prefix and the backend collection name.
pub trait Resource:
    Serialize + DeserializeOwned + Debug + Clone + PartialEq + Send + Sync + 'static
{
    const NAME: &'static str;
    const TITLE: &'static str;

    /// The collection for this resource on an authenticated client
    fn collection(client: &Client) -> &dyn Collection<Self>;

    /// Server-assigned identifier, absent until the backend has created the record
    fn id(&self) -> Option<String>;

    /// Short human-readable label for index rows and page titles
    fn label(&self) -> String;
}
