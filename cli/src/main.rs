mod render;


use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use client::{
    AuthState, CaptivePortal, Credentials, ErrorCategory, HttpTransport, Navigator, PortalError, RedirectTarget,
    TransportConfig, redirect,
};
use serde_json::Value;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid page URL: {0}")]
    InvalidPageUrl(#[from] url::ParseError),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("health check failed: HTTP {0}")]
    Unhealthy(u16),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error(transparent)]
    Transport(#[from] PortalError),
    #[error("{} [{}]", .0.message(), .0.code())]
    Portal(ErrorCategory),
}

#[derive(Parser, Debug)]
#[command(name = "portal-cli", about = "Captive portal login from the terminal")]
struct Cli {
    #[arg(long, env = "PORTAL_BASE_URL", default_value = "http://127.0.0.1:3001")]
    base_url: String,

    #[arg(long, env = "PORTAL_PAGE_URL", help = "Login page URL; its `redir` parameter is followed after login")]
    page_url: Option<String>,

    #[arg(long, env = "PORTAL_TIMEOUT_SECS", help = "Per-request deadline")]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the portal backend is up.
    Ping,
    /// Show whether this machine is authorized.
    Status,
    /// Log on with a username and password.
    Login {
        #[arg(long)]
        user: String,
        #[arg(long, env = "PORTAL_PASSWORD", default_value = "", hide_env_values = true)]
        password: String,
    },
    /// Accept anonymous access.
    Continue,
    /// Log off.
    Logout,
}

/// Prints the destination instead of opening a browser.
struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&self, target: &RedirectTarget) {
        println!("continue to {target}");
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Ping => run_ping(&cli.base_url).await,
        ref command => {
            let portal = mount(&cli)?;
            let state = run_portal(&portal, command).await;
            println!("{}", render::render(&state));
            match state.error {
                Some(category) => Err(CliError::Portal(category)),
                None => Ok(()),
            }
        }
    }
}

async fn run_ping(base_url: &str) -> Result<(), CliError> {
    let url = format!("{}/api/health", base_url.trim_end_matches('/'));
    let response = reqwest::Client::new().get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::Unhealthy(status.as_u16()));
    }
    let body = response.json::<Value>().await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn mount(cli: &Cli) -> Result<CaptivePortal, CliError> {
    let mut config = TransportConfig::new(cli.base_url.clone());
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let transport = HttpTransport::new(config)?;

    let target = match cli.page_url.as_deref() {
        Some(raw) => redirect::resolve_from_page_url(&Url::parse(raw)?),
        None => None,
    };
    if let Some(target) = &target {
        tracing::debug!(%target, "redirect target resolved");
    }

    Ok(CaptivePortal::new(Arc::new(transport), Arc::new(PrintNavigator), target))
}

/// Mount-time status check, then the requested operation. Returns the
/// state the page would render afterwards.
async fn run_portal(portal: &CaptivePortal, command: &Command) -> AuthState {
    let _ = portal.check_status().await;

    match command {
        Command::Ping | Command::Status => {}
        Command::Login { user, password } => {
            let _ = portal.login(Credentials::new(user.as_str(), password.as_str())).await;
        }
        Command::Continue => {
            let _ = portal.login(Credentials::anonymous()).await;
        }
        Command::Logout => {
            let _ = portal.logout().await;
        }
    }
    portal.snapshot()
}
