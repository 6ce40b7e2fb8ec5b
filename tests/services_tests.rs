//! Emotion analysis, guidance, reports and account endpoints.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use safenest_client::{
    AnalyzeEmotionsInput, Audience, EmotionMessage, EmotionTrend, ErrorKind, GenerateReportInput,
    GetActionPlanInput, ReportMessage, RiskLevel, Severity,
};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_emotions_from_content() {
    let server = setup_mock_server().await;
    post_with_auth("/api/v1/analysis/emotions")
        .respond_with(success_response(json!({
            "dominant_emotions": ["sadness"],
            "emotion_scores": { "sadness": 0.8 },
            "trend": "worsening",
            "summary": "Persistent low mood",
            "recommended_followup": "Check in tonight",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .analysis()
        .analyze_emotions(AnalyzeEmotionsInput::from_content("nothing matters anymore"))
        .await
        .unwrap();

    assert_eq!(result.dominant_emotions, vec!["sadness".to_string()]);
    assert_eq!(result.trend, EmotionTrend::Worsening);
    assert_eq!(result.emotion_scores.unwrap().get("sadness"), Some(&0.8));

    let bodies = bodies_sent_to(&server, "/api/v1/analysis/emotions").await;
    assert_eq!(
        bodies,
        vec![json!({ "messages": [{ "sender": "user", "text": "nothing matters anymore" }] })]
    );
}

#[tokio::test]
async fn test_emotions_from_messages() {
    let server = setup_mock_server().await;
    post_with_auth("/api/v1/analysis/emotions")
        .respond_with(success_response(json!({ "trend": "improving" })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .analysis()
        .analyze_emotions(
            AnalyzeEmotionsInput::from_messages(vec![
                EmotionMessage::new("child", "i had a bad day"),
                EmotionMessage::new("parent", "want to talk?"),
            ])
            .with_external_id("conv_9"),
        )
        .await
        .unwrap();

    assert_eq!(result.trend, EmotionTrend::Improving);

    let bodies = bodies_sent_to(&server, "/api/v1/analysis/emotions").await;
    assert_eq!(
        bodies,
        vec![json!({
            "messages": [
                { "sender": "child", "text": "i had a bad day" },
                { "sender": "parent", "text": "want to talk?" },
            ],
            "external_id": "conv_9",
        })]
    );
}

#[tokio::test]
async fn test_emotions_require_content_or_messages() {
    let server = setup_mock_server().await;
    let client = client_for(&server);

    let err = client
        .analysis()
        .analyze_emotions(AnalyzeEmotionsInput::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_action_plan() {
    let server = setup_mock_server().await;
    post_with_auth("/api/v1/guidance/action-plan")
        .respond_with(success_response(json!({
            "audience": "educator",
            "steps": ["Separate the students", "Document", "Inform parents"],
            "tone": "calm",
            "approx_reading_level": "adult",
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .guidance()
        .get_action_plan(
            GetActionPlanInput::new("Student is being excluded at lunch")
                .with_audience(Audience::Educator)
                .with_child_age(11)
                .with_severity(Severity::Medium),
        )
        .await
        .unwrap();

    assert_eq!(result.audience, Audience::Educator);
    assert_eq!(result.steps.len(), 3);

    let bodies = bodies_sent_to(&server, "/api/v1/guidance/action-plan").await;
    assert_eq!(
        bodies,
        vec![json!({
            "role": "educator",
            "situation": "Student is being excluded at lunch",
            "child_age": 11,
            "severity": "medium",
        })]
    );
}

#[tokio::test]
async fn test_action_plan_defaults_to_parent() {
    let server = setup_mock_server().await;
    post_with_auth("/api/v1/guidance/action-plan")
        .respond_with(success_response(json!({ "audience": "parent", "steps": [] })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .guidance()
        .get_action_plan(GetActionPlanInput::new("Mean messages in a group chat"))
        .await
        .unwrap();

    let bodies = bodies_sent_to(&server, "/api/v1/guidance/action-plan").await;
    assert_eq!(
        bodies,
        vec![json!({ "role": "parent", "situation": "Mean messages in a group chat" })]
    );
}

#[tokio::test]
async fn test_incident_report() {
    let server = setup_mock_server().await;
    post_with_auth("/api/v1/reports/incident")
        .respond_with(success_response(json!({
            "summary": "Repeated insults over three days",
            "risk_level": "high",
            "categories": ["bullying"],
            "recommended_next_steps": ["Contact the school"],
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .reports()
        .generate_report(
            GenerateReportInput::new(vec![
                ReportMessage::new("user_a", "you're pathetic"),
                ReportMessage::new("child", "stop"),
            ])
            .with_child_age(13)
            .with_incident_type("bullying")
            .with_customer_id("cust_2"),
        )
        .await
        .unwrap();

    assert_eq!(result.risk_level, RiskLevel::High);
    assert_eq!(result.recommended_next_steps, vec!["Contact the school".to_string()]);

    let bodies = bodies_sent_to(&server, "/api/v1/reports/incident").await;
    assert_eq!(
        bodies,
        vec![json!({
            "messages": [
                { "sender": "user_a", "text": "you're pathetic" },
                { "sender": "child", "text": "stop" },
            ],
            "meta": { "child_age": 13, "type": "bullying" },
            "customer_id": "cust_2",
        })]
    );
}

#[tokio::test]
async fn test_report_meta_omitted_when_empty() {
    let server = setup_mock_server().await;
    post_with_auth("/api/v1/reports/incident")
        .respond_with(success_response(json!({ "summary": "ok" })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .reports()
        .generate_report(GenerateReportInput::new(vec![ReportMessage::new("a", "b")]))
        .await
        .unwrap();

    let bodies = bodies_sent_to(&server, "/api/v1/reports/incident").await;
    assert_eq!(bodies[0].get("meta"), None);
}

#[tokio::test]
async fn test_delete_account_data() {
    let server = setup_mock_server().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/account/data"))
        .and(header("Authorization", format!("Bearer {API_KEY}").as_str()))
        .respond_with(success_response(json!({ "message": "Data deleted", "deleted_count": 42 })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.account().delete_data().await.unwrap();

    assert_eq!(result.message, "Data deleted");
    assert_eq!(result.deleted_count, 42);

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
    assert!(requests[0].headers.get("content-type").is_none());
}

#[tokio::test]
async fn test_export_account_data() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/account/export"))
        .and(header("Accept", "application/json"))
        .respond_with(success_response(json!({
            "userId": "user_1",
            "exportedAt": "2026-01-15T10:30:00Z",
            "data": { "analyses": [] },
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.account().export_data().await.unwrap();

    assert_eq!(result.user_id, "user_1");
    assert_eq!(
        result.exported_at_utc().map(|t| t.to_rfc3339()),
        Some("2026-01-15T10:30:00+00:00".to_string())
    );
    assert!(result.data.is_some());
}

#[tokio::test]
async fn test_export_not_found() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/account/export"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": { "message": "No data" } })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.account().export_data().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}
