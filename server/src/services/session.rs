//! In-memory portal sessions.
//!
//! ARCHITECTURE
//! ============
//! A captive portal identifies clients by network address, so sessions are
//! keyed by client IP rather than by a cookie or bearer token. The session id
//! handed back by `logon` is informational only; nothing presents it again.
//!
//! TRADE-OFFS
//! ==========
//! Sessions never expire and are lost on restart. This is a test backend.

use std::collections::HashMap;
use std::fmt::Write;
use std::net::IpAddr;
use std::sync::Arc;

use rand::Rng;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

/// User name recorded for anonymous logons.
pub const ANONYMOUS_USER: &str = "anonymous";

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a random 8-byte hex session id.
#[must_use]
pub fn generate_session_id() -> String {
    let bytes: [u8; 8] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// One authorized client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub user: String,
    /// Unix epoch milliseconds at logon.
    pub timestamp: i64,
}

impl Session {
    /// Attributes reported as `sessionInfo` by the status endpoint.
    #[must_use]
    pub fn info(&self) -> Map<String, Value> {
        let mut info = Map::new();
        info.insert("user".into(), Value::from(self.user.as_str()));
        info.insert("authorized".into(), Value::Bool(true));
        info.insert("timestamp".into(), Value::from(self.timestamp));
        info
    }
}

/// Shared session table. Cloning shares the table.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<IpAddr, Session>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Authorize `client` as `user`, replacing any previous session.
    /// An empty `user` is recorded as [`ANONYMOUS_USER`].
    pub async fn create(&self, client: IpAddr, user: &str) -> Session {
        let user = if user.is_empty() { ANONYMOUS_USER } else { user };
        let session = Session { id: generate_session_id(), user: user.to_owned(), timestamp: now_millis() };
        self.inner.write().await.insert(client, session.clone());
        session
    }

    pub async fn get(&self, client: IpAddr) -> Option<Session> {
        self.inner.read().await.get(&client).cloned()
    }

    /// Remove the client's session, returning it if there was one.
    pub async fn remove(&self, client: IpAddr) -> Option<Session> {
        self.inner.write().await.remove(&client)
    }

    pub async fn count(&self) -> usize {
        self.inner.read().await.len()
    }
}

fn now_millis() -> i64 {
    let nanos = time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    i64::try_from(nanos).unwrap_or(i64::MAX)
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
