//! Wire contract for the captive-portal access API.
//!
//! This crate owns the JSON representation shared by `server` and `client`.
//! Raw bodies (`StatusBody`, `LogonBody`, `LogoffBody`) mirror the portal's
//! camelCase payloads and are what the backend emits. Typed replies are
//! tagged on `clientState`, so the client has to handle every outcome
//! instead of probing optional fields.


mod case;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use case::{camel_case_key, normalize_keys};

/// Error returned when a portal body does not fit the contract.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The JSON value could not be read as the endpoint's body shape.
    #[error("malformed {endpoint} response: {source}")]
    Malformed { endpoint: Endpoint, source: serde_json::Error },
}

// =============================================================================
// ENDPOINTS
// =============================================================================

/// The three portal operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Status,
    Logon,
    Logoff,
}

impl Endpoint {
    /// Short operation name, as used in the URL path.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Logon => "logon",
            Self::Logoff => "logoff",
        }
    }

    /// Absolute request path, including the trailing slash the portal expects.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Status => "/api/captiveportal/access/status/",
            Self::Logon => "/api/captiveportal/access/logon/",
            Self::Logoff => "/api/captiveportal/access/logoff/",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// CLIENT STATE / AUTH MODE
// =============================================================================

/// Whether the portal currently lets this client through.
///
/// On the wire this is `"AUTHORIZED"`, `"UNAUTHORIZED"` or `""`. Anything the
/// client does not recognise is read as `Unknown` rather than rejected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum ClientState {
    Authorized,
    Unauthorized,
    #[default]
    Unknown,
}

impl ClientState {
    /// Read a raw `clientState` value.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("AUTHORIZED") {
            Self::Authorized
        } else if raw.eq_ignore_ascii_case("UNAUTHORIZED") {
            Self::Unauthorized
        } else {
            Self::Unknown
        }
    }

    #[must_use]
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Authorized => "AUTHORIZED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Unknown => "",
        }
    }

    #[must_use]
    pub fn is_authorized(self) -> bool {
        self == Self::Authorized
    }
}

impl From<String> for ClientState {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<ClientState> for &'static str {
    fn from(state: ClientState) -> Self {
        state.as_wire()
    }
}

impl fmt::Display for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str("UNKNOWN"),
            other => f.write_str(other.as_wire()),
        }
    }
}

/// Authentication method the portal requires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AuthMode {
    /// Username and password.
    Password,
    /// No credentials; the user only has to accept.
    Anonymous,
    /// Not reported yet, or reported as something unrecognised.
    #[default]
    Unknown,
}

impl AuthMode {
    /// Map an `authType` value. Portals report credentialed auth as either
    /// `password` or `normal`.
    #[must_use]
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("password" | "normal") => Self::Password,
            Some("none") => Self::Anonymous,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::Anonymous => "none",
            Self::Unknown => "",
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Password => "password",
            Self::Anonymous => "anonymous",
            Self::Unknown => "unknown",
        })
    }
}

// =============================================================================
// CREDENTIALS / SESSION
// =============================================================================

/// Logon payload. Empty strings are valid and mean an anonymous attempt.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self { user: user.into(), password: password.into() }
    }

    /// Credentials for an anonymous ("click to continue") logon.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// True when a username was supplied.
    #[must_use]
    pub fn has_user(&self) -> bool {
        !self.user.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.password.is_empty() { "(empty)" } else { "***" };
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &password)
            .finish()
    }
}

/// Server-reported session attributes for an authorized client.
///
/// Treated as passthrough data: the keys are whatever the portal sends
/// (after key normalization), and nothing beyond presence is validated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionSnapshot(Map<String, Value>);

impl SessionSnapshot {
    #[must_use]
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self(attributes)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The reported identity, when the portal includes one.
    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.0.get("user").and_then(Value::as_str)
    }


}

// =============================================================================
// RAW BODIES
// =============================================================================

/// `POST status/` response body.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBody {
    #[serde(default)]
    pub client_state: ClientState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,
    #[serde(default)]
    pub session_info: Option<Map<String, Value>>,
}

/// `POST logon/` response body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogonBody {
    #[serde(default)]
    pub client_state: ClientState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// `POST logoff/` response body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoffBody {
    #[serde(default)]
    pub client_state: ClientState,
    #[serde(default)]
    pub message: String,
}

// =============================================================================
// TYPED REPLIES
// =============================================================================

/// Status reply, tagged on `clientState`.
#[derive(Clone, Debug, PartialEq)]
pub enum StatusReply {
    Authorized { auth_mode: AuthMode, session: Option<SessionSnapshot> },
    Unauthorized { auth_mode: AuthMode },
    /// The portal answered but did not commit to either state (`""`).
    Indeterminate { auth_mode: AuthMode },
}

impl StatusReply {
    /// Decode a key-normalized status body.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Malformed`] when the value is not a status body.
    pub fn decode(value: Value) -> Result<Self, WireError> {
        decode_body::<StatusBody>(Endpoint::Status, value).map(Self::from)
    }

    #[must_use]
    pub fn client_state(&self) -> ClientState {
        match self {
            Self::Authorized { .. } => ClientState::Authorized,
            Self::Unauthorized { .. } => ClientState::Unauthorized,
            Self::Indeterminate { .. } => ClientState::Unknown,
        }
    }

    #[must_use]
    pub fn auth_mode(&self) -> AuthMode {
        match self {
            Self::Authorized { auth_mode, .. }
            | Self::Unauthorized { auth_mode }
            | Self::Indeterminate { auth_mode } => *auth_mode,
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&SessionSnapshot> {
        match self {
            Self::Authorized { session, .. } => session.as_ref(),
            _ => None,
        }
    }
}

impl From<StatusBody> for StatusReply {
    fn from(body: StatusBody) -> Self {
        let auth_mode = AuthMode::from_wire(body.auth_type.as_deref());
        match body.client_state {
            ClientState::Authorized => {
                Self::Authorized { auth_mode, session: body.session_info.map(SessionSnapshot::new) }
            }
            ClientState::Unauthorized => Self::Unauthorized { auth_mode },
            ClientState::Unknown => Self::Indeterminate { auth_mode },
        }
    }
}

/// Logon reply, tagged on `clientState`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogonReply {
    Authorized { session_id: Option<String>, message: String },
    /// Anything other than `AUTHORIZED` means the portal did not accept the attempt.
    Rejected { state: ClientState, message: String },
}

impl LogonReply {
    /// Decode a key-normalized logon body.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Malformed`] when the value is not a logon body.
    pub fn decode(value: Value) -> Result<Self, WireError> {
        decode_body::<LogonBody>(Endpoint::Logon, value).map(Self::from)
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Authorized { message, .. } | Self::Rejected { message, .. } => message,
        }
    }
}

impl From<LogonBody> for LogonReply {
    fn from(body: LogonBody) -> Self {
        match body.client_state {
            ClientState::Authorized => Self::Authorized { session_id: body.session_id, message: body.message },
            state => Self::Rejected { state, message: body.message },
        }
    }
}

/// Logoff reply. The client de-authorizes regardless of its content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogoffReply {
    pub client_state: ClientState,
    pub message: String,
}

impl LogoffReply {
    /// Decode a key-normalized logoff body.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Malformed`] when the value is not a logoff body.
    pub fn decode(value: Value) -> Result<Self, WireError> {
        decode_body::<LogoffBody>(Endpoint::Logoff, value).map(Self::from)
    }
}

impl From<LogoffBody> for LogoffReply {
    fn from(body: LogoffBody) -> Self {
        Self { client_state: body.client_state, message: body.message }
    }
}

fn decode_body<T>(endpoint: Endpoint, value: Value) -> Result<T, WireError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(value).map_err(|source| WireError::Malformed { endpoint, source })
}
