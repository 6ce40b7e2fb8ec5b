//! Mock implementations for testing.
//!
//! Provides a scriptable transport and auth provider so the request
//! pipeline can be exercised without network access.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::auth::AuthProvider;
use crate::errors::SafeNestResult;
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};

/// A recorded request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request path.
    pub path: String,
    /// Request body.
    pub body: Option<Vec<u8>>,
    /// Request headers.
    pub headers: HashMap<String, String>,
}

impl RecordedRequest {
    /// Parses the body as JSON.
    pub fn json(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_slice(body).ok())
    }

    /// Returns a header value, ignoring the case of the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        crate::transport::header_value(&self.headers, name)
    }
}

/// A mock response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl MockResponse {
    /// Creates a successful JSON response.
    pub fn json<T: serde::Serialize>(value: &T) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_default();
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        Self {
            status: 200,
            headers,
            body,
        }
    }

    /// Creates an error response in the SafeNest error shape.
    pub fn error(status: u16, message: &str) -> Self {
        let error = serde_json::json!({
            "error": {
                "message": message,
            }
        });
        Self::json(&error).with_status(status)
    }

    /// Creates a response with a raw body.
    pub fn raw(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Sets the status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Adds a header.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }
}

#[derive(Debug, Clone)]
enum MockReply {
    Response(MockResponse),
    Fault(TransportError),
}

/// Mock HTTP transport for testing.
///
/// Replies are taken from the queue registered for the request path first,
/// then from the shared queue, then from the default. Per-path queues keep
/// concurrent sub-requests deterministic.
#[derive(Default)]
pub struct MockTransport {
    queue: Mutex<VecDeque<MockReply>>,
    by_path: Mutex<HashMap<String, VecDeque<MockReply>>>,
    default_response: Mutex<Option<MockResponse>>,
    delay: Mutex<Option<Duration>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response on the shared queue.
    pub fn queue(&self, response: MockResponse) {
        lock(&self.queue).push_back(MockReply::Response(response));
    }

    /// Queues a JSON response on the shared queue.
    pub fn queue_json<T: serde::Serialize>(&self, value: &T) {
        self.queue(MockResponse::json(value));
    }

    /// Queues an error response on the shared queue.
    pub fn queue_error(&self, status: u16, message: &str) {
        self.queue(MockResponse::error(status, message));
    }

    /// Queues a transport fault on the shared queue.
    pub fn queue_fault(&self, fault: TransportError) {
        lock(&self.queue).push_back(MockReply::Fault(fault));
    }

    /// Queues a response for one path.
    pub fn queue_for(&self, path: &str, response: MockResponse) {
        lock(&self.by_path)
            .entry(path.to_string())
            .or_default()
            .push_back(MockReply::Response(response));
    }

    /// Queues a transport fault for one path.
    pub fn queue_fault_for(&self, path: &str, fault: TransportError) {
        lock(&self.by_path)
            .entry(path.to_string())
            .or_default()
            .push_back(MockReply::Fault(fault));
    }

    /// Sets the response used once the queues are empty.
    pub fn set_default(&self, response: MockResponse) {
        *lock(&self.default_response) = Some(response);
    }

    /// Delays every reply.
    pub fn set_delay(&self, delay: Duration) {
        *lock(&self.delay) = Some(delay);
    }

    /// Gets all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Gets the requests sent to one path.
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        lock(&self.requests)
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    /// Gets the last recorded request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Returns the number of requests made.
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    fn next_reply(&self, path: &str) -> MockReply {
        if let Some(reply) = lock(&self.by_path).get_mut(path).and_then(VecDeque::pop_front) {
            return reply;
        }
        if let Some(reply) = lock(&self.queue).pop_front() {
            return reply;
        }
        let response = lock(&self.default_response)
            .clone()
            .unwrap_or_else(|| MockResponse::error(500, "No mock response configured"));
        MockReply::Response(response)
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.requests).push(RecordedRequest {
            method: request.method,
            path: request.path.clone(),
            body: request.body.clone(),
            headers: request.headers.clone(),
        });

        let delay = *lock(&self.delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.next_reply(&request.path) {
            MockReply::Response(response) => Ok(HttpResponse {
                status: response.status,
                headers: response.headers,
                body: response.body,
            }),
            MockReply::Fault(fault) => Err(fault),
        }
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("request_count", &self.request_count())
            .finish()
    }
}

/// Mock auth provider for testing.
pub struct MockAuth {
    api_key: String,
}

impl MockAuth {
    /// Creates a new mock auth provider.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

impl Default for MockAuth {
    fn default() -> Self {
        Self::new("sn_mock_test_key")
    }
}

impl AuthProvider for MockAuth {
    fn apply_auth(&self, headers: &mut HashMap<String, String>) {
        headers.insert("Authorization".to_string(), format!("Bearer {}", self.api_key));
    }

    fn scheme(&self) -> &str {
        "Bearer"
    }

    fn validate(&self) -> SafeNestResult<()> {
        Ok(())
    }
}

impl std::fmt::Debug for MockAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockAuth").finish()
    }
}

/// Response bodies in the shape the service returns.
pub mod fixtures {
    use serde_json::{json, Value};

    /// Bullying detection body.
    pub fn bullying(risk_score: f64, is_bullying: bool) -> Value {
        json!({
            "is_bullying": is_bullying,
            "bullying_type": if is_bullying { vec!["harassment"] } else { Vec::new() },
            "confidence": 0.9,
            "severity": if is_bullying { "high" } else { "low" },
            "rationale": "fixture",
            "recommended_action": if is_bullying { "flag_for_moderator" } else { "none" },
            "risk_score": risk_score,
        })
    }

    /// Unsafe content detection body.
    pub fn unsafe_content(risk_score: f64, categories: &[&str]) -> Value {
        json!({
            "unsafe": !categories.is_empty(),
            "categories": categories,
            "severity": if categories.is_empty() { "low" } else { "critical" },
            "confidence": 0.85,
            "risk_score": risk_score,
            "rationale": "fixture",
            "recommended_action": if categories.is_empty() { "none" } else { "immediate_intervention" },
        })
    }

    /// Grooming detection body.
    pub fn grooming(risk: &str, risk_score: f64) -> Value {
        json!({
            "grooming_risk": risk,
            "flags": ["secrecy_request"],
            "confidence": 0.8,
            "rationale": "fixture",
            "risk_score": risk_score,
            "recommended_action": "monitor",
        })
    }

    /// Emotion analysis body.
    pub fn emotions() -> Value {
        json!({
            "dominant_emotions": ["sadness", "anxiety"],
            "emotion_scores": {"sadness": 0.7, "anxiety": 0.5},
            "trend": "worsening",
            "summary": "fixture",
            "recommended_followup": "check in",
        })
    }

    /// Action plan body.
    pub fn action_plan(audience: &str) -> Value {
        json!({
            "audience": audience,
            "steps": ["Listen", "Document", "Report"],
            "tone": "supportive",
            "approx_reading_level": "grade 6",
        })
    }

    /// Incident report body.
    pub fn report() -> Value {
        json!({
            "summary": "fixture",
            "risk_level": "high",
            "categories": ["bullying"],
            "recommended_next_steps": ["Contact school"],
        })
    }
}
