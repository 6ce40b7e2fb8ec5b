//! Shared helpers for the WireMock integration tests.

#![allow(dead_code, clippy::expect_used)]

use std::time::Duration;

use safenest_client::SafeNestClient;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

pub const API_KEY: &str = "sn_integration_key";

/// Starts a mock server.
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// A client pointed at the mock server with short retry delays.
pub fn client_for(server: &MockServer) -> SafeNestClient {
    client_with_retries(server, 3)
}

pub fn client_with_retries(server: &MockServer, max_retries: u32) -> SafeNestClient {
    SafeNestClient::builder()
        .api_key(API_KEY)
        .base_url(server.uri())
        .max_retries(max_retries)
        .retry_delay(Duration::from_millis(10))
        .build()
        .expect("client should build")
}

/// A mock matching an authenticated POST.
pub fn post_with_auth(route: &str) -> MockBuilder {
    Mock::given(method("POST"))
        .and(path(route))
        .and(header("Authorization", format!("Bearer {API_KEY}").as_str()))
}

pub fn success_response(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

pub fn error_response(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({ "error": { "message": message } }))
}

/// JSON bodies of every request the server received on `route`.
pub async fn bodies_sent_to(server: &MockServer, route: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == route)
        .map(|r| serde_json::from_slice(&r.body).expect("request body should be JSON"))
        .collect()
}

pub fn bullying_body(risk_score: f64, is_bullying: bool) -> Value {
    json!({
        "is_bullying": is_bullying,
        "bullying_type": if is_bullying { vec!["exclusion"] } else { Vec::new() },
        "confidence": 0.92,
        "severity": if is_bullying { "high" } else { "low" },
        "rationale": "test",
        "recommended_action": if is_bullying { "flag_for_moderator" } else { "none" },
        "risk_score": risk_score,
    })
}

pub fn unsafe_body(risk_score: f64, categories: &[&str]) -> Value {
    json!({
        "unsafe": !categories.is_empty(),
        "categories": categories,
        "severity": if categories.is_empty() { "low" } else { "critical" },
        "confidence": 0.88,
        "risk_score": risk_score,
        "rationale": "test",
        "recommended_action": if categories.is_empty() { "none" } else { "immediate_intervention" },
    })
}
