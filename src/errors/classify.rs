//! Maps transport outcomes onto the error taxonomy.
//!
//! Classification is total: a malformed or missing error body still yields a
//! classified error with a generic message.

use serde_json::Value;
use std::time::Duration;

use super::{ErrorKind, SafeNestError};
use crate::transport::{HttpResponse, TransportError};

const DEFAULT_MESSAGE: &str = "Request failed";

/// Outcome of a failed exchange, as seen by the classifier.
#[derive(Debug)]
pub enum Outcome<'a> {
    /// The server answered with a non-2xx status.
    Response(&'a HttpResponse),
    /// The exchange failed below HTTP.
    Transport(&'a TransportError),
    /// The caller cancelled the exchange.
    Cancelled,
}

/// Classifies a failed exchange into a [`SafeNestError`].
pub fn classify(outcome: Outcome<'_>) -> SafeNestError {
    match outcome {
        Outcome::Response(response) => classify_status(response),
        Outcome::Transport(err) => classify_transport(err),
        Outcome::Cancelled => SafeNestError::cancelled(),
    }
}

/// Classifies an error response by status code.
///
/// The body is parsed best-effort for `{"error": {"message", "code",
/// "suggestion", "details"}}`; the kind depends only on the status.
pub fn classify_status(response: &HttpResponse) -> SafeNestError {
    let status = response.status;
    let body = ErrorBody::parse(&response.body);

    let kind = match status {
        400 => ErrorKind::Validation,
        401 => ErrorKind::Authentication,
        403 => ErrorKind::TierAccess,
        404 => ErrorKind::NotFound,
        429 => ErrorKind::RateLimit,
        s if s >= 500 => ErrorKind::Server,
        _ => ErrorKind::Generic,
    };

    let mut error = SafeNestError::new(kind, body.message).with_status(status);
    if let Some(code) = body.code {
        error = error.with_code(code);
    }
    if let Some(suggestion) = body.suggestion {
        error = error.with_suggestion(suggestion);
    }
    if let Some(details) = body.details {
        error = error.with_details(details);
    }

    if kind == ErrorKind::RateLimit {
        let retry_after = response
            .header("retry-after")
            .and_then(parse_retry_after)
            .or(body.retry_after);
        if let Some(retry_after) = retry_after {
            error = error.with_retry_after(retry_after);
        }
    }

    error
}

/// Classifies a transport-level fault.
pub fn classify_transport(err: &TransportError) -> SafeNestError {
    match err {
        TransportError::Timeout { timeout } => SafeNestError::timeout(format!(
            "request timed out after {}ms",
            timeout.as_millis()
        )),
        TransportError::Connection { message } | TransportError::InvalidResponse { message } => {
            SafeNestError::network(message.clone())
        }
    }
}

/// Fields salvaged from an error response body.
struct ErrorBody {
    message: String,
    code: Option<String>,
    suggestion: Option<String>,
    details: Option<Value>,
    retry_after: Option<Duration>,
}

impl ErrorBody {
    fn parse(body: &[u8]) -> Self {
        let mut parsed = ErrorBody {
            message: DEFAULT_MESSAGE.to_string(),
            code: None,
            suggestion: None,
            details: None,
            retry_after: None,
        };

        let Ok(root) = serde_json::from_slice::<Value>(body) else {
            return parsed;
        };
        let Some(error) = root.get("error") else {
            return parsed;
        };

        if let Some(message) = error.get("message").and_then(Value::as_str) {
            parsed.message = message.to_string();
        }
        parsed.code = error.get("code").and_then(Value::as_str).map(str::to_string);
        parsed.suggestion = error
            .get("suggestion")
            .and_then(Value::as_str)
            .map(str::to_string);
        parsed.details = error.get("details").filter(|d| !d.is_null()).cloned();
        parsed.retry_after = error
            .get("retry_after")
            .or_else(|| parsed.details.as_ref().and_then(|d| d.get("retry_after")))
            .and_then(seconds_from_json);

        parsed
    }
}

fn seconds_from_json(value: &Value) -> Option<Duration> {
    match value {
        Value::Number(n) => n.as_f64().and_then(seconds_to_duration),
        Value::String(s) => parse_retry_after(s),
        _ => None,
    }
}

/// Parses a `Retry-After` value given in seconds.
fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<f64>().ok().and_then(seconds_to_duration)
}

/// Negative, non-finite and out-of-range values are discarded.
fn seconds_to_duration(secs: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(secs).ok()
}
