// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway routes driven in-process against a mock analysis backend.

use std::sync::Arc;

use axum::body::{Body, to_bytes};
use http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use websage_core::Resource;
use websage_gateway::{GatewayState, router};
use websage_proxy::BackendProxy;
use websage_test_utils::{MockBackend, fixtures};
use wiremock::matchers::{any, body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECRET: &str = "gateway-test-secret";

fn app_with_proxy(base_url: &str, secret: Option<&str>) -> axum::Router {
    let proxy = BackendProxy::new(base_url, secret).unwrap();
    router(GatewayState::new(Arc::new(proxy)))
}

async fn call(app: axum::Router, method: Method, uri: &str, body: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

fn json_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

#[tokio::test]
async fn protected_routes_without_secret_are_500_and_offline() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let routes = [
        (Method::POST, "/analyze"),
        (Method::GET, "/analyze/sessions/s1"),
        (Method::POST, "/converse"),
        (Method::GET, "/converse/history/s1"),
    ];
    for (m, uri) in routes {
        let app = app_with_proxy(&server.uri(), None);
        let (status, body) = call(app, m, uri, "{}").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(
            json_body(&body),
            json!({"error": "Server misconfigured: missing API secret"}),
            "{uri}"
        );
    }
}

#[tokio::test]
async fn session_list_without_secret_is_empty() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = app_with_proxy(&server.uri(), None);
    let (status, body) = call(app, Method::GET, "/analyze/sessions", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!([]));
}

#[tokio::test]
async fn analyze_passes_body_and_status_through() {
    let server = MockServer::start().await;
    let request = r#"{"url":"https://acme.test","questions":["Who are they?"]}"#;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .and(header("authorization", format!("Bearer {SECRET}").as_str()))
        .and(body_string(request))
        .respond_with(ResponseTemplate::new(201).set_body_json(fixtures::detail("https://acme.test")))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_with_proxy(&server.uri(), Some(SECRET));
    let (status, body) = call(app, Method::POST, "/analyze", request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json_body(&body), fixtures::detail("https://acme.test"));
}

#[tokio::test]
async fn upstream_validation_error_is_relayed() {
    let server = MockServer::start().await;
    let detail = json!({"detail": [{"loc": ["body", "query"], "msg": "field required"}]});
    Mock::given(method("POST"))
        .and(path("/converse"))
        .respond_with(ResponseTemplate::new(422).set_body_json(detail.clone()))
        .mount(&server)
        .await;

    let app = app_with_proxy(&server.uri(), Some(SECRET));
    let (status, body) = call(app, Method::POST, "/converse", "{}").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(&body), detail);
}

#[tokio::test]
async fn unreachable_backend_is_502_with_host_only() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let app = app_with_proxy(&format!("http://127.0.0.1:{port}"), Some(SECRET));

    let (status, body) = call(app, Method::GET, "/converse/history/s1", "").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let body = json_body(&body);
    assert_eq!(body["backendUrl"], format!("http://127.0.0.1:{port}"));
    assert!(!body.to_string().contains(SECRET));
}

#[tokio::test]
async fn history_parse_failure_becomes_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/converse/history/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let app = app_with_proxy(&server.uri(), Some(SECRET));
    let (status, body) = call(app, Method::GET, "/converse/history/s1", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!([]));
}

#[tokio::test]
async fn session_view_route_returns_view_model() {
    let backend = MockBackend::new()
        .with_response(
            Resource::SessionList,
            fixtures::ok(json!([fixtures::session("s1", "https://acme.test")])),
        )
        .with_response(
            Resource::History,
            fixtures::ok(json!([fixtures::history_entry("Q", "A", "2025-03-01T10:00:00")])),
        )
        .with_response(Resource::SessionDetail, fixtures::status(500, json!({})));
    let app = router(GatewayState::new(Arc::new(backend)));

    let (status, body) = call(app, Method::GET, "/sessions/s1/view", "").await;
    assert_eq!(status, StatusCode::OK);
    let view = json_body(&body);
    assert_eq!(view["session"]["id"], "s1");
    assert_eq!(view["company_insights"]["industry"], "Not available");
    assert_eq!(view["conversation_history"].as_array().unwrap().len(), 2);
    assert_eq!(view["conversation_history"][0]["role"], "user");
    assert_eq!(view["degraded"], json!(["detail"]));
    assert_eq!(view["title"], "acme.test");
}

#[tokio::test]
async fn session_view_route_unknown_id_is_404() {
    let app = router(GatewayState::new(Arc::new(MockBackend::new())));
    let (status, body) = call(app, Method::GET, "/sessions/missing/view", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body(&body), json!({"error": "Session not found"}));
}

#[tokio::test]
async fn health_reports_backend_configuration() {
    let app = router(GatewayState::new(Arc::new(MockBackend::unconfigured())));
    let (status, body) = call(app, Method::GET, "/health", "").await;
    assert_eq!(status, StatusCode::OK);
    let health = json_body(&body);
    assert_eq!(health["status"], "ok");
    assert_eq!(health["backend_configured"], false);
    assert!(health["version"].is_string());
}
