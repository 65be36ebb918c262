//! Authorization and CORS integration tests

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method, StatusCode};
use serde_json::{json, Value};

use crate::common::TestHarness;
use crate::mocks::test_data;
use deeprelay::{AllowAll, BearerTokenAuthorizer};

const TOKEN: &str = "relay-test-token";

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

#[tokio::test]
async fn test_allow_all_admits_requests_without_credentials() {
    let harness = TestHarness::with_authorizer(Arc::new(AllowAll)).await;
    harness.upstream.mock_json(200, json!({"ok": true})).await;

    harness.server.get("/v1/models").await.assert_status_ok();
    harness
        .server
        .post("/v1/chat/completions")
        .add_header(header::AUTHORIZATION, HeaderValue::from_static("Bearer garbage"))
        .json(&test_data::chat_request("m"))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_bearer_token_required_on_v1_routes() {
    let harness = TestHarness::with_authorizer(Arc::new(BearerTokenAuthorizer::new(TOKEN))).await;

    let missing = harness.server.get("/v1/models").await;
    missing.assert_status(StatusCode::UNAUTHORIZED);
    assert!(missing.json::<Value>()["error"].is_string());

    harness
        .server
        .get("/v1/models")
        .add_header(header::AUTHORIZATION, bearer("wrong"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    harness
        .server
        .get("/v1/models")
        .add_header(header::AUTHORIZATION, bearer(TOKEN))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_denied_completion_never_reaches_upstream() {
    let harness = TestHarness::with_authorizer(Arc::new(BearerTokenAuthorizer::new(TOKEN))).await;
    harness.upstream.expect_no_calls().await;

    harness
        .server
        .post("/v1/chat/completions")
        .add_header(header::AUTHORIZATION, bearer("wrong"))
        .json(&test_data::chat_request("m"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_accepted_token_is_not_forwarded() {
    let harness = TestHarness::with_authorizer(Arc::new(BearerTokenAuthorizer::new(TOKEN))).await;
    harness.upstream.mock_json(200, json!({"ok": true})).await;

    harness
        .server
        .post("/v1/chat/completions")
        .add_header(header::AUTHORIZATION, bearer(TOKEN))
        .json(&test_data::chat_request("m"))
        .await
        .assert_status_ok();

    let received = harness.upstream.received_requests().await;
    assert!(received[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_health_is_public_under_bearer_auth() {
    let harness = TestHarness::with_authorizer(Arc::new(BearerTokenAuthorizer::new(TOKEN))).await;

    harness.server.get("/health/live").await.assert_status_ok();
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin_with_credentials() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .method(Method::OPTIONS, "/v1/chat/completions")
        .add_header(header::ORIGIN, HeaderValue::from_static("https://chat.example.org"))
        .add_header(
            header::ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("POST"),
        )
        .add_header(
            header::ACCESS_CONTROL_REQUEST_HEADERS,
            HeaderValue::from_static("authorization,content-type"),
        )
        .await;

    response.assert_status_ok();
    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://chat.example.org"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
        "POST"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
        "authorization,content-type"
    );
}

#[tokio::test]
async fn test_cors_headers_on_simple_request() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .get("/v1/models")
        .add_header(header::ORIGIN, HeaderValue::from_static("http://localhost:3000"))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:3000"
    );
}
