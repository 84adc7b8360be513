//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the three captive-portal access endpoints plus a few plain API
//! routes used to check that the backend is up. Handlers identify clients
//! by peer address, so the router must be served with
//! `into_make_service_with_connect_info::<SocketAddr>()`.

pub mod portal;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use wire::Endpoint;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(Endpoint::Status.path(), post(portal::status))
        .route(Endpoint::Logon.path(), post(portal::logon))
        .route(Endpoint::Logoff.path(), post(portal::logoff))
        .route("/api/health", get(health))
        .route("/api/hello", get(hello))
        .route("/api/echo", post(echo))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "API server is running" }))
}

async fn hello() -> Json<Value> {
    Json(json!({ "message": "Hello from the API server!" }))
}

async fn echo(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({ "message": "Echo response", "received": body }))
}
