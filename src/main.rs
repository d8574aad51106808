use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use admin_ui_rust::client::ClientFactory;
use admin_ui_rust::config::{self, AppConfig, SessionStore};
use admin_ui_rust::controller::UiPaths;
use admin_ui_rust::session::{BackendSessions, MemorySessions, SessionGate, SessionResolver};
use admin_ui_rust::{app, AppState};

/// Session-gated admin UI for the backend's user records
#[derive(Parser, Debug)]
#[command(name = "admin-ui", version)]
struct Args {
    /// Port to listen on (overrides ADMIN_UI_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Address to bind (overrides ADMIN_UI_HOST)
    #[arg(long)]
    bind: Option<String>,

    /// Backend API base URL (overrides ADMIN_UI_BACKEND_URL)
    #[arg(long)]
    backend_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up ADMIN_UI_* settings
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("admin_ui_rust=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let mut config = config::config().clone();
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(bind) = args.bind {
        config.server.host = bind;
    }
    if let Some(url) = args.backend_url {
        config.backend.base_url = url;
    }

    tracing::info!("Starting admin UI in {:?} mode", config.environment);

    let factory = ClientFactory::new(&config.backend)
        .with_context(|| format!("invalid backend configuration: {}", config.backend.base_url))?;

    match config.session.store {
        SessionStore::Backend => {
            tracing::info!(backend = %factory.base_url(), "verifying sessions against backend");
            serve(&config, BackendSessions::new(factory)).await
        }
        SessionStore::Memory => {
            let sessions = MemorySessions::new();
            if let Some(token) = config.session.dev_session.as_deref() {
                let client = match config.session.dev_api_token.as_deref() {
                    Some(api_token) => factory.client("token", api_token),
                    None => {
                        tracing::warn!("no ADMIN_UI_DEV_API_TOKEN set, dev session forwards its own token");
                        factory.client("session", token)
                    }
                };
                sessions.insert_with_token(token, client).await;
            } else {
                tracing::warn!("memory session store is empty, every request will be sent to login");
            }
            serve(&config, sessions).await
        }
    }
}

async fn serve<R: SessionResolver>(config: &AppConfig, resolver: R) -> anyhow::Result<()> {
    let paths = UiPaths::new(&config.ui.prefix);
    let gate = SessionGate::new(config.session.cookie_name.clone(), resolver);
    let router = app(AppState::new(gate, paths.clone()));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("admin UI listening on http://{}{}", bind_addr, paths.index("users"));

    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
