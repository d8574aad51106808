pub mod collection;
pub mod error;

pub use collection::{Collection, HttpCollection};
pub use error::{BackendError, ClientError};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::config::BackendConfig;
use crate::model::{Resource, User};

/// Credentials presented to the backend API
#[derive(Clone, PartialEq, Eq)]
pub struct Auth {
    pub kind: String,
    pub token: String,
}

impl Auth {
    pub fn new(kind: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            token: token.into(),
        }
    }

    /// Session-bound credentials, as used for cookie-gated UI requests
    pub fn session(token: impl Into<String>) -> Self {
        Self::new("session", token)
    }

    /// Long-lived API token credentials
    pub fn token(token: impl Into<String>) -> Self {
        Self::new("token", token)
    }

    pub fn header_value(&self) -> String {
        format!("SGAPI {}=\"{}\"", self.kind, self.token)
    }
}

// Never print the secret itself
impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("kind", &self.kind)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Authenticated handle exposing the backend resource collections
#[derive(Clone)]
pub struct Client {
    users: Arc<dyn Collection<User>>,
}

impl Client {
    pub fn new(users: Arc<dyn Collection<User>>) -> Self {
        Self { users }
    }

    pub fn users(&self) -> &dyn Collection<User> {
        self.users.as_ref()
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

/// Builds HTTP-backed clients for a given auth type/token pair
#[derive(Clone, Debug)]
pub struct ClientFactory {
    http: reqwest::Client,
    base: Url,
}

impl ClientFactory {
    pub fn new(config: &BackendConfig) -> Result<Self, ClientError> {
        let base = Url::parse(&config.base_url).map_err(|source| ClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
            source,
        })?;
        if base.cannot_be_a_base() {
            return Err(ClientError::CannotBeBase(config.base_url.clone()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn client(&self, auth_type: &str, auth_token: &str) -> Client {
        let auth = Auth::new(auth_type, auth_token);
        Client::new(Arc::new(self.collection::<User>(auth)))
    }

    fn collection<M: Resource>(&self, auth: Auth) -> HttpCollection<M> {
        HttpCollection::new(self.http.clone(), self.base.clone(), M::NAME, auth)
    }
}
