//! Retry, timeout and cancellation behavior over real HTTP.

mod common;

use std::time::{Duration, Instant};

use common::*;
use safenest_client::{CancellationToken, DetectBullyingInput, DetectUnsafeInput, ErrorKind, SafeNestClient};
use wiremock::ResponseTemplate;

const BULLYING: &str = "/api/v1/safety/bullying";

#[tokio::test]
async fn test_server_error_then_success() {
    let server = setup_mock_server().await;
    post_with_auth(BULLYING)
        .respond_with(error_response(503, "overloaded"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    post_with_auth(BULLYING)
        .respond_with(success_response(bullying_body(0.2, false)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .safety()
        .detect_bullying(DetectBullyingInput::new("text"))
        .await
        .unwrap();

    assert!(!result.is_bullying);
    let metrics = client.metrics();
    assert_eq!(metrics.retries, 2);
    assert_eq!(metrics.requests, 3);
    assert_eq!(metrics.successes, 1);
}

#[tokio::test]
async fn test_retry_budget_is_max_retries_plus_one() {
    let server = setup_mock_server().await;
    post_with_auth(BULLYING)
        .respond_with(error_response(500, "boom"))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_with_retries(&server, 2);
    let err = client
        .safety()
        .detect_bullying(DetectBullyingInput::new("text"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(err.message(), "boom");
}

#[tokio::test]
async fn test_zero_retries_single_attempt() {
    let server = setup_mock_server().await;
    post_with_auth(BULLYING)
        .respond_with(error_response(502, "bad gateway"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_retries(&server, 0);
    let err = client
        .safety()
        .detect_bullying(DetectBullyingInput::new("text"))
        .await
        .unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(client.metrics().retries, 0);
}

#[tokio::test]
async fn test_client_errors_not_retried() {
    for status in [400u16, 401, 403, 404] {
        let server = setup_mock_server().await;
        post_with_auth(BULLYING)
            .respond_with(error_response(status, "no"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .safety()
            .detect_bullying(DetectBullyingInput::new("text"))
            .await
            .unwrap_err();

        assert!(!err.is_retryable(), "status {status}");
        assert_eq!(err.status_code(), Some(status));
    }
}

#[tokio::test]
async fn test_rate_limit_waits_for_retry_after() {
    let server = setup_mock_server().await;
    post_with_auth(BULLYING)
        .respond_with(error_response(429, "slow down").insert_header("Retry-After", "1"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    post_with_auth(BULLYING)
        .respond_with(success_response(bullying_body(0.1, false)))
        .mount(&server)
        .await;

    // a 10 second backoff would blow the upper bound below
    let client = SafeNestClient::builder()
        .api_key(API_KEY)
        .base_url(server.uri())
        .retry_delay(Duration::from_secs(10))
        .build()
        .unwrap();

    let started = Instant::now();
    client
        .safety()
        .detect_bullying(DetectBullyingInput::new("text"))
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_millis(950), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(5), "{elapsed:?}");
}

#[tokio::test]
async fn test_rate_limit_exhaustion_reports_retry_after() {
    let server = setup_mock_server().await;
    post_with_auth(BULLYING)
        .respond_with(error_response(429, "slow down").insert_header("Retry-After", "0"))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_with_retries(&server, 1);
    let err = client
        .safety()
        .detect_bullying(DetectBullyingInput::new("text"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RateLimit);
    assert_eq!(err.retry_after(), Some(Duration::ZERO));
}

#[tokio::test]
async fn test_oversized_retry_after_is_ignored() {
    let server = setup_mock_server().await;
    post_with_auth(BULLYING)
        .respond_with(error_response(429, "slow down").insert_header("Retry-After", "1e20"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_retries(&server, 0);
    let err = client
        .safety()
        .detect_bullying(DetectBullyingInput::new("text"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RateLimit);
    assert_eq!(err.retry_after(), None);
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = setup_mock_server().await;
    post_with_auth(BULLYING)
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(bullying_body(0.1, false))
                .set_delay(Duration::from_secs(3)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = SafeNestClient::builder()
        .api_key(API_KEY)
        .base_url(server.uri())
        .timeout(Duration::from_secs(1))
        .max_retries(0)
        .build()
        .unwrap();

    let started = Instant::now();
    let err = client
        .safety()
        .detect_bullying(DetectBullyingInput::new("text"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(started.elapsed() < Duration::from_millis(2_500));
}

#[tokio::test]
async fn test_cancel_during_backoff() {
    let server = setup_mock_server().await;
    post_with_auth(BULLYING)
        .respond_with(error_response(503, "unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let client = SafeNestClient::builder()
        .api_key(API_KEY)
        .base_url(server.uri())
        .retry_delay(Duration::from_secs(20))
        .build()
        .unwrap();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let err = client
        .safety()
        .with_cancellation(cancel)
        .detect_bullying(DetectBullyingInput::new("text"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert!(err.is_cancelled());
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_cancel_in_flight_request() {
    let server = setup_mock_server().await;
    post_with_auth("/api/v1/safety/unsafe")
        .respond_with(success_response(unsafe_body(0.1, &[])).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let cancel = CancellationToken::new();
    let safety = client.safety().with_cancellation(cancel.clone());

    let call = tokio::spawn(async move { safety.detect_unsafe(DetectUnsafeInput::new("text")).await });
    tokio::time::sleep(Duration::from_millis(100)).await;
    cancel.cancel();

    let err = call.await.unwrap().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Cancelled);
}

#[tokio::test]
async fn test_pre_cancelled_token_sends_nothing() {
    let server = setup_mock_server().await;
    post_with_auth(BULLYING)
        .respond_with(success_response(bullying_body(0.1, false)))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = client
        .safety()
        .with_cancellation(cancel)
        .detect_bullying(DetectBullyingInput::new("text"))
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let client = SafeNestClient::builder()
        .api_key(API_KEY)
        .base_url("http://127.0.0.1:1")
        .max_retries(1)
        .retry_delay(Duration::from_millis(5))
        .build()
        .unwrap();

    let err = client
        .safety()
        .detect_bullying(DetectBullyingInput::new("text"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(err.is_retryable());
    assert_eq!(client.metrics().retries, 1);
}
