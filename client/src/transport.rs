//! Transport adapter for the portal access API.
//!
//! Client-side HTTP via `reqwest`. Every call is a `POST` with a JSON body
//! (`{}` when there is nothing to send); the portal answers 2xx for any
//! protocol-level success and reports the authorization outcome in
//! `clientState`, never in the HTTP status.
//!
//! ERROR HANDLING
//! ==============
//! Connect/IO failures and non-2xx statuses are the network-class failures.
//! A body that is not JSON or does not fit the contract is a decode failure.
//! Response keys are normalized to camelCase before decoding, so a portal
//! that speaks snake_case decodes the same way.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use wire::{ClientState, Credentials, Endpoint, LogoffReply, LogonReply, StatusReply, WireError, normalize_keys};

/// Failures surfaced by a [`PortalTransport`].
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    /// The request could not complete (connect, TLS, IO, timeout).
    #[error("{endpoint} request failed: {message}")]
    Network { endpoint: Endpoint, message: String },

    /// The portal answered with a non-2xx status.
    #[error("{endpoint} request returned HTTP {status}")]
    Status { endpoint: Endpoint, status: u16 },

    /// The body was not JSON.
    #[error("{endpoint} response is not JSON: {message}")]
    Body { endpoint: Endpoint, message: String },

    /// The body was JSON but not the shape the endpoint promises.
    #[error(transparent)]
    Decode(#[from] WireError),

    /// The portal answered but did not authorize the client.
    #[error("portal did not authorize the client after {endpoint} (state {state})")]
    Rejected { endpoint: Endpoint, state: ClientState },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

impl PortalError {
    /// True for failures where the request itself did not complete.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Status { .. })
    }
}

/// The three portal operations, as seen by the state machine.
#[async_trait]
pub trait PortalTransport: Send + Sync {
    async fn status(&self) -> Result<StatusReply, PortalError>;
    async fn logon(&self, credentials: &Credentials) -> Result<LogonReply, PortalError>;
    async fn logoff(&self) -> Result<LogoffReply, PortalError>;
}

// =============================================================================
// HTTP TRANSPORT
// =============================================================================

/// Where the portal lives and how long a caller is willing to wait.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportConfig {
    /// Origin of the portal, e.g. `"http://10.0.0.1:8000"`. Empty means
    /// same-origin paths.
    pub base_url: String,
    /// Optional per-request deadline. The state machine never imposes one.
    pub timeout: Option<Duration>,
}

impl TransportConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), timeout: None }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// [`PortalTransport`] over HTTP.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport for the portal at `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: TransportConfig) -> Result<Self, PortalError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| PortalError::ClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.trim_end_matches('/').to_owned() })
    }

    /// Full URL for an endpoint.
    #[must_use]
    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// Issue one portal request and return its key-normalized JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Network`] when the request cannot complete,
    /// [`PortalError::Status`] for non-2xx answers and [`PortalError::Body`]
    /// when the body is not JSON.
    pub async fn request(&self, endpoint: Endpoint, payload: Option<&Credentials>) -> Result<Value, PortalError> {
        let url = self.url(endpoint);
        let request = self.http.post(&url);
        let request = match payload {
            Some(credentials) => request.json(credentials),
            None => request.json(&Map::new()),
        };

        tracing::debug!(%endpoint, %url, "portal request");
        let response = request
            .send()
            .await
            .map_err(|e| PortalError::Network { endpoint, message: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%endpoint, status = status.as_u16(), "portal request rejected");
            return Err(PortalError::Status { endpoint, status: status.as_u16() });
        }

        let text = response
            .text()
            .await
            .map_err(|e| PortalError::Network { endpoint, message: e.to_string() })?;
        let raw: Value =
            serde_json::from_str(&text).map_err(|e| PortalError::Body { endpoint, message: e.to_string() })?;
        let body = normalize_keys(raw);

        tracing::debug!(%endpoint, %body, "portal response");
        Ok(body)
    }
}

#[async_trait]
impl PortalTransport for HttpTransport {
    async fn status(&self) -> Result<StatusReply, PortalError> {
        let body = self.request(Endpoint::Status, None).await?;
        Ok(StatusReply::decode(body)?)
    }

    async fn logon(&self, credentials: &Credentials) -> Result<LogonReply, PortalError> {
        let body = self.request(Endpoint::Logon, Some(credentials)).await?;
        Ok(LogonReply::decode(body)?)
    }

    async fn logoff(&self) -> Result<LogoffReply, PortalError> {
        let body = self.request(Endpoint::Logoff, None).await?;
        Ok(LogoffReply::decode(body)?)
    }
}
