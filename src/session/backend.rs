use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;

use super::{fingerprint, SessionResolver};
use crate::client::{Auth, Client, ClientFactory};

/// Verifies each session token against the backend's `sessions/{token}` endpoint
/// and binds a session-authenticated client on success.
pub struct BackendSessions {
    factory: ClientFactory,
}

impl BackendSessions {
    pub fn new(factory: ClientFactory) -> Self {
        Self { factory }
    }

    async fn verify(&self, token: &str) -> Result<bool, reqwest::Error> {
        let mut url = self.factory.base_url().clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("sessions").push(token);
        }

        let response = self
            .factory
            .http()
            .get(url)
            .header(AUTHORIZATION, Auth::session(token).header_value())
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(false),
            status => {
                tracing::warn!(session = %fingerprint(token), %status, "unexpected status verifying session");
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl SessionResolver for BackendSessions {
    async fn lookup(&self, token: &str) -> Option<Client> {
        match self.verify(token).await {
            Ok(true) => Some(self.factory.client("session", token)),
            Ok(false) => None,
            Err(e) => {
                tracing::warn!(session = %fingerprint(token), "session verification failed: {}", e);
                None
            }
        }
    }
}
