//! Scripted transport and recording navigator for state-machine tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use wire::{AuthMode, ClientState, Credentials, Endpoint, LogoffReply, LogonReply, SessionSnapshot, StatusReply};

use crate::redirect::{Navigator, RedirectTarget};
use crate::transport::{PortalError, PortalTransport};

/// Holds the next call to one endpoint in flight until released.
#[derive(Clone, Default)]
pub struct Hold {
    started: Arc<Notify>,
    release: Arc<Notify>,
}

impl Hold {
    /// Wait until the held call has been issued.
    pub async fn started(&self) {
        self.started.notified().await;
    }

    /// Let the held call complete.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

/// Transport that answers from per-endpoint queues and logs every call.
///
/// An empty queue answers with a neutral default: `UNAUTHORIZED` password
/// status, a rejected logon, a clean logoff.
#[derive(Default)]
pub struct ScriptedTransport {
    status: Mutex<VecDeque<Result<StatusReply, PortalError>>>,
    logon: Mutex<VecDeque<Result<LogonReply, PortalError>>>,
    logoff: Mutex<VecDeque<Result<LogoffReply, PortalError>>>,
    calls: Mutex<Vec<Endpoint>>,
    credentials: Mutex<Vec<Credentials>>,
    holds: Mutex<HashMap<Endpoint, Hold>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_status(&self, reply: Result<StatusReply, PortalError>) {
        self.status.lock().unwrap().push_back(reply);
    }

    pub fn push_logon(&self, reply: Result<LogonReply, PortalError>) {
        self.logon.lock().unwrap().push_back(reply);
    }

    pub fn push_logoff(&self, reply: Result<LogoffReply, PortalError>) {
        self.logoff.lock().unwrap().push_back(reply);
    }

    /// Hold the next call to `endpoint` until [`Hold::release`].
    pub fn hold(&self, endpoint: Endpoint) -> Hold {
        let hold = Hold::default();
        self.holds.lock().unwrap().insert(endpoint, hold.clone());
        hold
    }

    pub fn calls(&self) -> Vec<Endpoint> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sent_credentials(&self) -> Vec<Credentials> {
        self.credentials.lock().unwrap().clone()
    }

    async fn enter(&self, endpoint: Endpoint) {
        self.calls.lock().unwrap().push(endpoint);
        let hold = self.holds.lock().unwrap().remove(&endpoint);
        if let Some(hold) = hold {
            hold.started.notify_one();
            hold.release.notified().await;
        }
    }
}

#[async_trait]
impl PortalTransport for ScriptedTransport {
    async fn status(&self) -> Result<StatusReply, PortalError> {
        self.enter(Endpoint::Status).await;
        let next = self.status.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(unauthorized(AuthMode::Password)))
    }

    async fn logon(&self, credentials: &Credentials) -> Result<LogonReply, PortalError> {
        self.credentials.lock().unwrap().push(credentials.clone());
        self.enter(Endpoint::Logon).await;
        let next = self.logon.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(logon_rejected()))
    }

    async fn logoff(&self) -> Result<LogoffReply, PortalError> {
        self.enter(Endpoint::Logoff).await;
        let next = self.logoff.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(LogoffReply { client_state: ClientState::Unauthorized, message: String::new() }))
    }
}

/// Navigator that records every target instead of leaving the page.
#[derive(Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<RedirectTarget>>,
}

impl RecordingNavigator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn visited(&self) -> Vec<RedirectTarget> {
        self.visited.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, target: &RedirectTarget) {
        self.visited.lock().unwrap().push(target.clone());
    }
}

// =============================================================================
// REPLY BUILDERS
// =============================================================================

pub fn unauthorized(auth_mode: AuthMode) -> StatusReply {
    StatusReply::Unauthorized { auth_mode }
}

pub fn authorized(user: &str) -> StatusReply {
    let mut attributes = serde_json::Map::new();
    attributes.insert("user".to_owned(), serde_json::Value::from(user));
    attributes.insert("authorized".to_owned(), serde_json::Value::Bool(true));
    StatusReply::Authorized { auth_mode: AuthMode::Password, session: Some(SessionSnapshot::new(attributes)) }
}

pub fn logon_accepted() -> LogonReply {
    LogonReply::Authorized { session_id: Some("s-1".to_owned()), message: "Login successful".to_owned() }
}

pub fn logon_rejected() -> LogonReply {
    LogonReply::Rejected { state: ClientState::Unauthorized, message: "Invalid credentials".to_owned() }
}

pub fn network_error(endpoint: Endpoint) -> PortalError {
    PortalError::Network { endpoint, message: "connection refused".to_owned() }
}
