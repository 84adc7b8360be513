mod config;
mod routes;
mod services;
mod state;

use std::io;
use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;
use wire::AuthMode;

use crate::config::{ConfigError, PortalConfig};

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to bind {addr}: {source}")]
    Bind { addr: SocketAddr, source: io::Error },
    #[error("server failed: {0}")]
    Serve(io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = PortalConfig::from_env()?;
    let addr = config.socket_addr();
    match config.auth_mode {
        AuthMode::Password => {
            let username = &config.credentials.user;
            tracing::info!(auth_type = "password", %username, "captive portal auth configured");
        }
        mode => tracing::info!(auth_type = mode.as_wire(), "captive portal auth configured"),
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    tracing::info!(%addr, "portal backend listening");

    let app = routes::app(state::AppState::new(config));
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .map_err(StartupError::Serve)
}
