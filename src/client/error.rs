use thiserror::Error;

/// Failure reported by a backend collection call.
///
/// Only `NotFound` is treated differently by the UI (a 404 on reads); every other
/// variant is a generic backend failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("backend request timed out")]
    Timeout,

    #[error("backend unreachable: {0}")]
    Transport(String),

    #[error("unexpected backend response: {0}")]
    InvalidResponse(String),
}

impl BackendError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::NotFound(_))
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        BackendError::Rejected {
            status,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout
        } else if err.is_decode() {
            BackendError::InvalidResponse(err.to_string())
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

/// Errors building a backend client from configuration
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid backend URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("backend URL '{0}' cannot carry a path")]
    CannotBeBase(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
