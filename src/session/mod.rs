pub mod backend;
pub mod memory;

pub use backend::BackendSessions;
pub use memory::MemorySessions;

use async_trait::async_trait;
use axum::http::{header::COOKIE, HeaderMap};
use cookie::Cookie;
use sha2::{Digest, Sha256};

use crate::client::Client;

/// Resolves a session token to the backend client bound to it
#[async_trait]
pub trait SessionResolver: Send + Sync + 'static {
    /// `None` when the token is unknown or the store says there is no session
    async fn lookup(&self, token: &str) -> Option<Client>;
}

/// The single authentication boundary of the UI: session cookie in, client handle out
pub struct SessionGate<R> {
    cookie_name: String,
    resolver: R,
}

impl<R: SessionResolver> SessionGate<R> {
    pub fn new(cookie_name: impl Into<String>, resolver: R) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            resolver,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// First non-empty cookie carrying the configured name, across all Cookie headers
    pub fn session_token(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| Cookie::split_parse(value))
            .filter_map(Result::ok)
            .find(|cookie| cookie.name() == self.cookie_name && !cookie.value().trim().is_empty())
            .map(|cookie| cookie.value().trim().to_string())
    }

    /// Look the request's session up exactly once
    pub async fn resolve(&self, headers: &HeaderMap) -> Option<Client> {
        let Some(token) = self.session_token(headers) else {
            tracing::debug!(cookie = %self.cookie_name, "no session cookie on request");
            return None;
        };

        let client = self.resolver.lookup(&token).await;
        match &client {
            Some(_) => tracing::debug!(session = %fingerprint(&token), "session resolved"),
            None => tracing::debug!(session = %fingerprint(&token), "session not recognised"),
        }
        client
    }
}

/// Short digest of a session token, safe to write to logs
pub fn fingerprint(token: &str) -> String {
    Sha256::digest(token.as_bytes())
        .iter()
        .take(4)
        .map(|byte| format!("{:02x}", byte))
        .collect()
}
