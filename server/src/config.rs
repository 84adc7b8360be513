//! Backend configuration parsed from environment variables.
//!
//! All variables are optional. A value that is present but unparsable is a
//! startup error rather than a silent fallback to the default.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use wire::{AuthMode, Credentials};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "password123";
pub const DEFAULT_STATUS_DELAY_MS: u64 = 1000;
pub const DEFAULT_LOGON_DELAY_MS: u64 = 3000;
pub const DEFAULT_LOGOFF_DELAY_MS: u64 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}={value:?}: {reason}")]
    Invalid { var: &'static str, value: String, reason: String },
}

/// Artificial latency per endpoint, emulating a slow gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delays {
    pub status: Duration,
    pub logon: Duration,
    pub logoff: Duration,
}

impl Delays {
    #[cfg(test)]
    #[must_use]
    pub fn none() -> Self {
        Self { status: Duration::ZERO, logon: Duration::ZERO, logoff: Duration::ZERO }
    }
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            status: Duration::from_millis(DEFAULT_STATUS_DELAY_MS),
            logon: Duration::from_millis(DEFAULT_LOGON_DELAY_MS),
            logoff: Duration::from_millis(DEFAULT_LOGOFF_DELAY_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Never `AuthMode::Unknown`.
    pub auth_mode: AuthMode,
    /// Accepted credentials in password mode.
    pub credentials: Credentials,
    pub delays: Delays,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            auth_mode: AuthMode::Password,
            credentials: Credentials::new(DEFAULT_USERNAME, DEFAULT_PASSWORD),
            delays: Delays::default(),
        }
    }
}

impl PortalConfig {
    /// Build config from the process environment.
    ///
    /// Optional:
    /// - `PORT`: default 3001
    /// - `BIND_ADDR`: default `0.0.0.0`
    /// - `AUTH_TYPE`: `password` (default, `normal` accepted) or `none`
    /// - `PORTAL_USERNAME` / `PORTAL_PASSWORD`: default `admin` / `password123`
    /// - `STATUS_DELAY_MS`: default 1000
    /// - `LOGON_DELAY_MS`: default 3000
    /// - `LOGOFF_DELAY_MS`: default 3000
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let auth_mode = match lookup("AUTH_TYPE") {
            Some(raw) => parse_auth_mode(&raw)?,
            None => defaults.auth_mode,
        };
        let credentials = Credentials::new(
            lookup("PORTAL_USERNAME").unwrap_or(defaults.credentials.user),
            lookup("PORTAL_PASSWORD").unwrap_or(defaults.credentials.password),
        );
        let delays = Delays {
            status: Duration::from_millis(env_parse(&lookup, "STATUS_DELAY_MS", DEFAULT_STATUS_DELAY_MS)?),
            logon: Duration::from_millis(env_parse(&lookup, "LOGON_DELAY_MS", DEFAULT_LOGON_DELAY_MS)?),
            logoff: Duration::from_millis(env_parse(&lookup, "LOGOFF_DELAY_MS", DEFAULT_LOGOFF_DELAY_MS)?),
        };

        Ok(Self {
            bind_addr: env_parse(&lookup, "BIND_ADDR", defaults.bind_addr)?,
            port: env_parse(&lookup, "PORT", defaults.port)?,
            auth_mode,
            credentials,
            delays,
        })
    }

    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn env_parse<T>(lookup: &impl Fn(&str) -> Option<String>, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid { var, value: raw.clone(), reason: e.to_string() })
}

fn parse_auth_mode(raw: &str) -> Result<AuthMode, ConfigError> {
    match AuthMode::from_wire(Some(raw.trim())) {
        AuthMode::Unknown => Err(ConfigError::Invalid {
            var: "AUTH_TYPE",
            value: raw.to_owned(),
            reason: "expected 'password', 'normal' or 'none'".into(),
        }),
        mode => Ok(mode),
    }
}
