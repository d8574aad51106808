//! Shared types used across the controller

/// UI actions served for every resource
/// Used by the executor, the response router and request logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    New,
    Show,
    Edit,
    Create,
    Update,
}

impl Action {
    /// Read actions render the request path; write actions redirect on success
    pub fn is_write(&self) -> bool {
        matches!(self, Action::Create | Action::Update)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::List => "list",
            Action::New => "new",
            Action::Show => "show",
            Action::Edit => "edit",
            Action::Create => "create",
            Action::Update => "update",
        }
    }
}

/// Classified result of one request, the only input the response router looks at
/// besides the action itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    NotFound,
    BackendError,
    DecodeError,
    Unauthenticated,
}
