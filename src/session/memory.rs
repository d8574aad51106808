use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{fingerprint, SessionResolver};
use crate::client::Client;

/// In-process session table, used for development seeding and tests
#[derive(Default)]
pub struct MemorySessions {
    sessions: RwLock<HashMap<String, Client>>,
}

impl MemorySessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a fresh random token to `client` and return it
    pub async fn insert(&self, client: Client) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.insert_with_token(token.clone(), client).await;
        token
    }

    pub async fn insert_with_token(&self, token: impl Into<String>, client: Client) {
        let token = token.into();
        tracing::info!(session = %fingerprint(&token), "session registered");
        self.sessions.write().await.insert(token, client);
    }

    /// Returns whether a session was removed
    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionResolver for MemorySessions {
    async fn lookup(&self, token: &str) -> Option<Client> {
        self.sessions.read().await.get(token).cloned()
    }
}
