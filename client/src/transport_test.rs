use super::*;
use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::post;
use serde_json::json;
use wire::AuthMode;

/// Serve `router` on an ephemeral local port and return its base URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn transport(base_url: &str) -> HttpTransport {
    HttpTransport::new(TransportConfig::new(base_url)).unwrap()
}

// =============================================================
// URL building
// =============================================================

#[test]
fn url_trims_trailing_slash_from_base() {
    let transport = transport("http://portal.lan:8000/");
    assert_eq!(transport.url(Endpoint::Status), "http://portal.lan:8000/api/captiveportal/access/status/");
    assert_eq!(transport.url(Endpoint::Logoff), "http://portal.lan:8000/api/captiveportal/access/logoff/");
}

#[test]
fn empty_base_url_yields_same_origin_paths() {
    let transport = transport("");
    assert_eq!(transport.url(Endpoint::Logon), "/api/captiveportal/access/logon/");
}

// =============================================================
// Successful requests
// =============================================================

#[tokio::test]
async fn status_decodes_snake_case_body() {
    let router = Router::new().route(
        Endpoint::Status.path(),
        post(|| async {
            Json(json!({
                "client_state": "AUTHORIZED",
                "auth_type": "none",
                "session_info": { "user": "anonymous", "start_time": 5 }
            }))
        }),
    );
    let base = serve(router).await;

    let reply = transport(&base).status().await.unwrap();
    assert_eq!(reply.client_state(), ClientState::Authorized);
    assert_eq!(reply.auth_mode(), AuthMode::Anonymous);
    let session = reply.session().expect("session");
    assert_eq!(session.user(), Some("anonymous"));
    assert_eq!(session.get("startTime"), Some(&json!(5)));
}

#[tokio::test]
async fn request_keeps_unknown_fields() {
    let router = Router::new().route(
        Endpoint::Status.path(),
        post(|| async { Json(json!({ "clientState": "", "vendor_build": { "fw_rev": "24.1" } })) }),
    );
    let base = serve(router).await;

    let body = transport(&base).request(Endpoint::Status, None).await.unwrap();
    assert_eq!(body["vendorBuild"], json!({ "fwRev": "24.1" }));
}

#[tokio::test]
async fn logon_sends_credentials_as_json() {
    let router = Router::new().route(
        Endpoint::Logon.path(),
        post(|Json(body): Json<serde_json::Value>| async move {
            let ok = body == json!({ "user": "admin", "password": "password123" });
            Json(json!({
                "clientState": if ok { "AUTHORIZED" } else { "UNAUTHORIZED" },
                "sessionId": "s1",
                "message": "checked"
            }))
        }),
    );
    let base = serve(router).await;

    let reply = transport(&base)
        .logon(&Credentials::new("admin", "password123"))
        .await
        .unwrap();
    assert_eq!(reply, LogonReply::Authorized { session_id: Some("s1".to_owned()), message: "checked".to_owned() });
}

#[tokio::test]
async fn status_and_logoff_send_empty_object() {
    async fn expect_empty(Json(body): Json<serde_json::Value>) -> Json<serde_json::Value> {
        let state = if body == json!({}) { "UNAUTHORIZED" } else { "AUTHORIZED" };
        Json(json!({ "clientState": state, "message": "" }))
    }
    let router = Router::new()
        .route(Endpoint::Status.path(), post(expect_empty))
        .route(Endpoint::Logoff.path(), post(expect_empty));
    let base = serve(router).await;
    let transport = transport(&base);

    let status = transport.status().await.unwrap();
    assert_eq!(status.client_state(), ClientState::Unauthorized);
    let logoff = transport.logoff().await.unwrap();
    assert_eq!(logoff.client_state, ClientState::Unauthorized);
}

// =============================================================
// Failures
// =============================================================

#[tokio::test]
async fn non_success_status_is_network_class() {
    let router = Router::new().route(Endpoint::Status.path(), post(|| async { StatusCode::BAD_GATEWAY }));
    let base = serve(router).await;

    let err = transport(&base).status().await.unwrap_err();
    assert!(matches!(err, PortalError::Status { endpoint: Endpoint::Status, status: 502 }));
    assert!(err.is_network());
}

#[tokio::test]
async fn html_body_is_body_error() {
    let router = Router::new().route(Endpoint::Logon.path(), post(|| async { "<html>captive</html>" }));
    let base = serve(router).await;

    let err = transport(&base)
        .logon(&Credentials::anonymous())
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::Body { endpoint: Endpoint::Logon, .. }));
    assert!(!err.is_network());
}

#[tokio::test]
async fn wrong_shape_is_decode_error() {
    let router = Router::new().route(Endpoint::Logoff.path(), post(|| async { Json(json!(42)) }));
    let base = serve(router).await;

    let err = transport(&base).logoff().await.unwrap_err();
    assert!(matches!(err, PortalError::Decode(_)));
}

#[tokio::test]
async fn unreachable_portal_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = transport(&format!("http://{addr}")).status().await.unwrap_err();
    assert!(matches!(err, PortalError::Network { endpoint: Endpoint::Status, .. }));
}

#[tokio::test]
async fn caller_timeout_is_network_error() {
    let router = Router::new().route(
        Endpoint::Status.path(),
        post(|| async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Json(json!({ "clientState": "AUTHORIZED" }))
        }),
    );
    let base = serve(router).await;
    let transport = HttpTransport::new(TransportConfig::new(base).with_timeout(Duration::from_millis(50))).unwrap();

    let err = transport.status().await.unwrap_err();
    assert!(err.is_network());
}
