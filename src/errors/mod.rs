//! Error types for the SafeNest client.
//!
//! Every failure surfaced by the client is a [`SafeNestError`]. The error
//! carries an [`ErrorKind`] from a fixed taxonomy, which decides whether the
//! request pipeline retries it, plus whatever the service reported about the
//! failure (machine code, suggestion, structured details, retry-after hint).

mod classify;

pub use classify::{classify, classify_status, classify_transport, Outcome};

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for SafeNest operations.
pub type SafeNestResult<T> = Result<T, SafeNestError>;

/// Kind of failure, as classified from the transport outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The API key was rejected (HTTP 401).
    Authentication,
    /// The request was invalid (HTTP 400, or rejected before sending).
    Validation,
    /// The requested resource does not exist (HTTP 404).
    NotFound,
    /// The account tier does not include this feature (HTTP 403).
    TierAccess,
    /// Too many requests (HTTP 429).
    RateLimit,
    /// The service failed (HTTP 5xx).
    Server,
    /// The request deadline expired.
    Timeout,
    /// The connection failed or the exchange was interrupted.
    Network,
    /// The caller cancelled the request.
    Cancelled,
    /// The client was configured incorrectly.
    Configuration,
    /// Any other failure.
    Generic,
}

impl ErrorKind {
    /// Returns true if a request failing with this kind may succeed when retried.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            ErrorKind::RateLimit | ErrorKind::Server | ErrorKind::Timeout | ErrorKind::Network
        )
    }

    /// Returns a stable identifier for this kind, used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Authentication => "authentication",
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::TierAccess => "tier_access",
            ErrorKind::RateLimit => "rate_limit",
            ErrorKind::Server => "server",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Network => "network",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Configuration => "configuration",
            ErrorKind::Generic => "generic",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by every SafeNest operation.
#[derive(Debug, Clone, Error)]
#[error("{}", render(.kind, .message, .status))]
pub struct SafeNestError {
    kind: ErrorKind,
    message: String,
    status: Option<u16>,
    code: Option<String>,
    details: Option<serde_json::Value>,
    suggestion: Option<String>,
    retry_after: Option<Duration>,
}

fn render(kind: &ErrorKind, message: &str, status: &Option<u16>) -> String {
    match (kind, status) {
        (ErrorKind::Authentication, _) => format!("Authentication failed: {}", message),
        (ErrorKind::Validation, _) => format!("Validation error: {}", message),
        (ErrorKind::NotFound, _) => format!("Not found: {}", message),
        (ErrorKind::TierAccess, _) => format!("Tier access denied: {}", message),
        (ErrorKind::RateLimit, _) => format!("Rate limit exceeded: {}", message),
        (ErrorKind::Server, Some(status)) => format!("Server error (HTTP {}): {}", status, message),
        (ErrorKind::Server, None) => format!("Server error: {}", message),
        (ErrorKind::Timeout, _) => format!("Request timeout: {}", message),
        (ErrorKind::Network, _) => format!("Network error: {}", message),
        (ErrorKind::Cancelled, _) => format!("Request cancelled: {}", message),
        (ErrorKind::Configuration, _) => format!("Configuration error: {}", message),
        (ErrorKind::Generic, Some(status)) => {
            format!("Request failed (HTTP {}): {}", status, message)
        }
        (ErrorKind::Generic, None) => format!("Request failed: {}", message),
    }
}

impl SafeNestError {
    /// Creates an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            code: None,
            details: None,
            suggestion: None,
            retry_after: None,
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    /// Creates the error reported when the caller cancels a request.
    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "the operation was cancelled by the caller")
    }

    /// Sets the HTTP status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the machine-readable error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the structured error details.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Sets the suggested remedy.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Sets the server's retry-after hint.
    pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = Some(retry_after);
        self
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status code, if the failure came from a response.
    pub fn status_code(&self) -> Option<u16> {
        self.status
    }

    /// Returns the machine-readable error code (e.g. `AUTH_1001`).
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Returns the structured details reported by the service.
    pub fn details(&self) -> Option<&serde_json::Value> {
        self.details.as_ref()
    }

    /// Returns the suggested remedy reported by the service.
    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    /// Returns how long the service asked the caller to wait before retrying.
    pub fn retry_after(&self) -> Option<Duration> {
        self.retry_after
    }

    /// Returns the retry-after hint in whole seconds.
    pub fn retry_after_secs(&self) -> Option<u64> {
        self.retry_after.map(|d| d.as_secs())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// Returns true if the caller cancelled the request.
    pub fn is_cancelled(&self) -> bool {
        self.kind == ErrorKind::Cancelled
    }
}

impl From<serde_json::Error> for SafeNestError {
    fn from(err: serde_json::Error) -> Self {
        SafeNestError::new(ErrorKind::Generic, format!("Serialization error: {}", err))
    }
}

impl From<url::ParseError> for SafeNestError {
    fn from(err: url::ParseError) -> Self {
        SafeNestError::configuration(format!("Invalid URL: {}", err))
    }
}
