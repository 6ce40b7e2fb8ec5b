//! Error classification and boundary checks seen through the public API.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use safenest_client::{
    DetectBullyingInput, DetectGroomingInput, DetectUnsafeInput, ErrorKind, GenerateReportInput,
    GetActionPlanInput, GroomingMessage, MessageRole, SafeNestClient, MAX_CONTENT_LENGTH,
};
use serde_json::json;
use test_case::test_case;
use wiremock::matchers::any;
use wiremock::{Mock, ResponseTemplate};

#[test_case(400, ErrorKind::Validation ; "bad request")]
#[test_case(401, ErrorKind::Authentication ; "unauthorized")]
#[test_case(403, ErrorKind::TierAccess ; "forbidden")]
#[test_case(404, ErrorKind::NotFound ; "not found")]
#[test_case(429, ErrorKind::RateLimit ; "rate limited")]
#[test_case(500, ErrorKind::Server ; "server error")]
#[test_case(418, ErrorKind::Generic ; "unexpected status")]
#[tokio::test]
async fn test_status_classification(status: u16, expected: ErrorKind) {
    let server = setup_mock_server().await;
    post_with_auth("/api/v1/safety/bullying")
        .respond_with(error_response(status, "failure"))
        .mount(&server)
        .await;

    let client = client_with_retries(&server, 0);
    let err = client
        .safety()
        .detect_bullying(DetectBullyingInput::new("text"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), expected);
    assert_eq!(err.status_code(), Some(status));
    assert_eq!(err.message(), "failure");
}

#[tokio::test]
async fn test_error_body_details_are_kept() {
    let server = setup_mock_server().await;
    post_with_auth("/api/v1/safety/unsafe")
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {
                "message": "Grooming detection requires the Pro tier",
                "code": "TIER_REQUIRED",
                "suggestion": "Upgrade your plan",
                "details": { "required_tier": "pro" },
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .safety()
        .detect_unsafe(DetectUnsafeInput::new("text"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TierAccess);
    assert_eq!(err.code(), Some("TIER_REQUIRED"));
    assert_eq!(err.suggestion(), Some("Upgrade your plan"));
    assert_eq!(err.details(), Some(&json!({ "required_tier": "pro" })));
}

#[tokio::test]
async fn test_non_json_error_body_gets_generic_message() {
    let server = setup_mock_server().await;
    post_with_auth("/api/v1/safety/bullying")
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let client = client_with_retries(&server, 0);
    let err = client
        .safety()
        .detect_bullying(DetectBullyingInput::new("text"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(err.message(), "Request failed");
}

#[tokio::test]
async fn test_unparseable_success_body_is_not_retried() {
    let server = setup_mock_server().await;
    post_with_auth("/api/v1/safety/bullying")
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .safety()
        .detect_bullying(DetectBullyingInput::new("text"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Generic);
    assert_eq!(err.message(), "Failed to parse API response");
}

#[tokio::test]
async fn test_invalid_input_rejected_before_sending() {
    let server = setup_mock_server().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let safety = client.safety();

    let errors = vec![
        safety.detect_bullying(DetectBullyingInput::new("")).await.unwrap_err(),
        safety
            .detect_unsafe(DetectUnsafeInput::new("x".repeat(MAX_CONTENT_LENGTH + 1)))
            .await
            .unwrap_err(),
        safety
            .detect_grooming(DetectGroomingInput::new(Vec::new()))
            .await
            .unwrap_err(),
        safety
            .detect_grooming(DetectGroomingInput::new(
                (0..101).map(|i| GroomingMessage::new(MessageRole::Child, format!("m{i}"))).collect(),
            ))
            .await
            .unwrap_err(),
        client
            .guidance()
            .get_action_plan(GetActionPlanInput::new("   "))
            .await
            .unwrap_err(),
        client
            .reports()
            .generate_report(GenerateReportInput::new(Vec::new()))
            .await
            .unwrap_err(),
    ];

    for err in errors {
        assert_eq!(err.kind(), ErrorKind::Validation, "{err}");
        assert_eq!(err.status_code(), None);
    }
    assert_eq!(client.metrics().requests, 0);
}

#[tokio::test]
async fn test_content_at_limit_is_accepted() {
    let server = setup_mock_server().await;
    post_with_auth("/api/v1/safety/bullying")
        .respond_with(success_response(bullying_body(0.0, false)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    // multi-byte characters count once each
    let content = "é".repeat(MAX_CONTENT_LENGTH);
    client
        .safety()
        .detect_bullying(DetectBullyingInput::new(content))
        .await
        .unwrap();
}

#[test_case("short" ; "short key")]
#[test_case("          " ; "blank key")]
fn test_bad_api_key_is_configuration_error(key: &str) {
    let err = SafeNestClient::from_api_key(key).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test_case("http://api.safenest.dev" ; "plain http remote")]
#[test_case("not a url" ; "garbage")]
fn test_bad_base_url_is_configuration_error(base_url: &str) {
    let err = SafeNestClient::builder()
        .api_key(API_KEY)
        .base_url(base_url)
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}
