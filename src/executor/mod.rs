//! Single-exchange request execution.
//!
//! [`RequestExecutor`] performs one HTTP exchange under the configured
//! deadline, raced against the caller's cancellation token. Every completed
//! exchange publishes its response metadata, error responses included.
//! Retrying is the caller's concern (see [`crate::resilience::RetryPolicy`]).

use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::auth::AuthProvider;
use crate::errors::{classify, Outcome, SafeNestError, SafeNestResult};
use crate::metadata::{MetadataState, ResponseMetadata};
use crate::observability::ClientMetrics;
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

/// What to send: method, path and an already-serialized JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path relative to the base URL.
    pub path: String,
    /// JSON body bytes.
    pub body: Option<Vec<u8>>,
}

impl RequestDescriptor {
    /// Creates a GET descriptor.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            body: None,
        }
    }

    /// Creates a DELETE descriptor.
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Delete,
            path: path.into(),
            body: None,
        }
    }

    /// Creates a POST descriptor with a JSON body.
    pub fn post_json<T: Serialize + ?Sized>(path: impl Into<String>, body: &T) -> SafeNestResult<Self> {
        Ok(Self {
            method: HttpMethod::Post,
            path: path.into(),
            body: Some(serde_json::to_vec(body)?),
        })
    }
}

/// Executes single HTTP exchanges for a client.
pub struct RequestExecutor {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
    timeout: Duration,
    custom_headers: Vec<(String, String)>,
    metadata: Arc<MetadataState>,
    metrics: Arc<ClientMetrics>,
}

impl RequestExecutor {
    /// Creates an executor.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthProvider>,
        timeout: Duration,
        metadata: Arc<MetadataState>,
        metrics: Arc<ClientMetrics>,
    ) -> Self {
        Self {
            transport,
            auth,
            timeout,
            custom_headers: Vec::new(),
            metadata,
            metrics,
        }
    }

    /// Adds headers sent with every request. Authentication and content
    /// negotiation headers take precedence.
    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.custom_headers = headers;
        self
    }

    /// Returns the per-exchange deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn build_request(&self, descriptor: &RequestDescriptor) -> HttpRequest {
        let mut request = HttpRequest::new(descriptor.method, descriptor.path.clone());
        request.headers.extend(self.custom_headers.iter().cloned());
        self.auth.apply_auth(&mut request.headers);

        let request = request.with_header("Accept", "application/json");
        match &descriptor.body {
            Some(body) => request
                .with_header("Content-Type", "application/json")
                .with_body(body.clone()),
            None => request,
        }
    }

    /// Performs one exchange.
    ///
    /// Returns the raw 2xx response. Deadline expiry fails with a timeout
    /// error, a fired token with a cancellation error, and non-2xx responses
    /// with the classified error.
    #[instrument(skip(self, descriptor, cancel), fields(method = %descriptor.method, path = %descriptor.path))]
    pub async fn execute(
        &self,
        descriptor: &RequestDescriptor,
        cancel: &CancellationToken,
    ) -> SafeNestResult<HttpResponse> {
        if cancel.is_cancelled() {
            return Err(classify(Outcome::Cancelled));
        }

        let request = self.build_request(descriptor);
        let started = Instant::now();

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(self.fail(classify(Outcome::Cancelled), started.elapsed()));
            }
            result = tokio::time::timeout(self.timeout, self.transport.send(request)) => result,
        };
        let latency = started.elapsed();

        let response = match outcome {
            Err(_elapsed) => {
                let err = SafeNestError::timeout(format!(
                    "Request to {} timed out after {}ms",
                    descriptor.path,
                    self.timeout.as_millis()
                ));
                return Err(self.fail(err, latency));
            }
            Ok(Err(fault)) => {
                let err = classify(Outcome::Transport(&fault));
                return Err(self.fail(err, latency));
            }
            Ok(Ok(response)) => response,
        };

        self.metadata
            .publish(&ResponseMetadata::from_headers(&response.headers), latency);

        if !response.is_success() {
            let err = classify(Outcome::Response(&response));
            return Err(self.fail(err, latency));
        }

        self.metrics.record_success(latency);
        tracing::debug!(
            status = response.status,
            latency_ms = latency.as_millis() as u64,
            "Request completed"
        );
        Ok(response)
    }

    fn fail(&self, err: SafeNestError, latency: Duration) -> SafeNestError {
        self.metrics.record_failure(err.kind(), latency);
        tracing::debug!(kind = %err.kind(), status = ?err.status_code(), error = %err, "Exchange failed");
        err
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("timeout", &self.timeout)
            .field("custom_headers", &self.custom_headers.len())
            .finish()
    }
}
