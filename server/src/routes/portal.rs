//! Captive-portal access endpoints.
//!
//! Every endpoint answers 2xx for any protocol-level outcome; a refused
//! logon is a `clientState` of `UNAUTHORIZED`, not an HTTP error. Only a
//! logon body that cannot be read at all is a 400.

use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use wire::{ClientState, LogoffBody, LogonBody, StatusBody};

use crate::services::access;
use crate::services::session::Session;
use crate::state::AppState;

pub const LOGIN_SUCCESSFUL: &str = "Login successful";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const LOGGED_OUT: &str = "Logged out successfully";

/// `POST /api/captiveportal/access/status/`
pub async fn status(State(state): State<AppState>, ConnectInfo(peer): ConnectInfo<SocketAddr>) -> Json<StatusBody> {
    let client = peer.ip();
    let session = state.sessions.get(client).await;
    let auth_type = state.config.auth_mode.as_wire();
    tracing::info!(%client, authorized = session.is_some(), auth_type, "status check");

    tokio::time::sleep(state.config.delays.status).await;

    let client_state = if session.is_some() { ClientState::Authorized } else { ClientState::Unauthorized };
    Json(StatusBody {
        client_state,
        auth_type: Some(state.config.auth_mode.as_wire().to_owned()),
        session_info: session.as_ref().map(Session::info),
    })
}

/// `POST /api/captiveportal/access/logon/`
pub async fn logon(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let client = peer.ip();
    let content_type = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let attempt = match access::parse_credentials(content_type, &body) {
        Ok(attempt) => attempt,
        Err(e) => {
            tracing::warn!(%client, error = %e, "unreadable logon body");
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };
    // Credentials' Debug masks the password.
    tracing::info!(%client, credentials = ?attempt, auth_type = state.config.auth_mode.as_wire(), "logon attempt");

    let accepted = access::authenticate(&state.config, &attempt);

    tokio::time::sleep(state.config.delays.logon).await;

    let Some(user) = accepted else {
        tracing::info!(%client, "logon failed");
        return Json(LogonBody {
            client_state: ClientState::Unauthorized,
            session_id: None,
            message: INVALID_CREDENTIALS.to_owned(),
        })
        .into_response();
    };

    let session = state.sessions.create(client, &user).await;
    let sessions = state.sessions.count().await;
    tracing::info!(%client, session_id = %session.id, user = %session.user, sessions, "logon successful");
    Json(LogonBody {
        client_state: ClientState::Authorized,
        session_id: Some(session.id),
        message: LOGIN_SUCCESSFUL.to_owned(),
    })
    .into_response()
}

/// `POST /api/captiveportal/access/logoff/`
pub async fn logoff(State(state): State<AppState>, ConnectInfo(peer): ConnectInfo<SocketAddr>) -> Json<LogoffBody> {
    let client = peer.ip();
    match state.sessions.remove(client).await {
        Some(session) => tracing::info!(%client, session_id = %session.id, "session deleted"),
        None => tracing::info!(%client, "logoff without session"),
    }

    tokio::time::sleep(state.config.delays.logoff).await;

    Json(LogoffBody { client_state: ClientState::Unauthorized, message: LOGGED_OUT.to_owned() })
}

#[cfg(test)]
#[path = "portal_test.rs"]
mod tests;
