use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_SESSION_COOKIE: &str = "admin_ui_session";
pub const DEFAULT_UI_PREFIX: &str = "/ui";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub backend: BackendConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Where session cookies are resolved to backend clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStore {
    /// In-process token map, seeded from `dev_session`/`dev_api_token`
    Memory,
    /// Every cookie is verified against the backend sessions endpoint
    Backend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub store: SessionStore,
    pub dev_session: Option<String>,
    pub dev_api_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub prefix: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("ADMIN_UI_HOST") {
            self.server.host = v;
        }
        if let Some(port) = env::var("ADMIN_UI_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|v| v.parse().ok())
        {
            self.server.port = port;
        }

        // Session overrides
        if let Ok(v) = env::var("ADMIN_UI_SESSION_COOKIE") {
            if !v.trim().is_empty() {
                self.session.cookie_name = v.trim().to_string();
            }
        }
        match env::var("ADMIN_UI_SESSION_STORE").as_deref() {
            Ok("memory") => self.session.store = SessionStore::Memory,
            Ok("backend") => self.session.store = SessionStore::Backend,
            _ => {}
        }
        if let Ok(v) = env::var("ADMIN_UI_DEV_SESSION") {
            self.session.dev_session = Some(v);
        }
        if let Ok(v) = env::var("ADMIN_UI_DEV_API_TOKEN") {
            self.session.dev_api_token = Some(v);
        }

        // Backend overrides
        if let Ok(v) = env::var("ADMIN_UI_BACKEND_URL") {
            self.backend.base_url = v;
        }
        if let Ok(v) = env::var("ADMIN_UI_BACKEND_TIMEOUT_SECS") {
            self.backend.timeout_secs = v.parse().unwrap_or(self.backend.timeout_secs);
        }

        // UI overrides
        if let Ok(v) = env::var("ADMIN_UI_PREFIX") {
            self.ui.prefix = normalize_prefix(&v);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 10000,
            },
            session: SessionConfig {
                cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
                store: SessionStore::Memory,
                dev_session: None,
                dev_api_token: None,
            },
            backend: BackendConfig {
                base_url: "http://localhost:8080/api/v0".to_string(),
                timeout_secs: 30,
            },
            ui: UiConfig {
                prefix: DEFAULT_UI_PREFIX.to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 10000,
            },
            session: SessionConfig {
                cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
                store: SessionStore::Backend,
                dev_session: None,
                dev_api_token: None,
            },
            backend: BackendConfig {
                base_url: "http://localhost:8080/api/v0".to_string(),
                timeout_secs: 10,
            },
            ui: UiConfig {
                prefix: DEFAULT_UI_PREFIX.to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 10000,
            },
            session: SessionConfig {
                cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
                store: SessionStore::Backend,
                dev_session: None,
                dev_api_token: None,
            },
            backend: BackendConfig {
                base_url: "http://localhost:8080/api/v0".to_string(),
                timeout_secs: 5,
            },
            ui: UiConfig {
                prefix: DEFAULT_UI_PREFIX.to_string(),
            },
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// "/ui/", "ui" and "/ui" all mean the same mount point
pub fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
