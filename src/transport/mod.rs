//! HTTP transport layer for the SafeNest client.
//!
//! Provides the HTTP transport abstraction and the reqwest-backed
//! implementation. The transport only moves bytes; status handling and
//! retries live above it.

mod http;

pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, HttpTransportImpl};

use std::collections::HashMap;
use std::time::Duration;

/// Transport error types.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// Connection error.
    #[error("Connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Timeout error.
    #[error("Timeout after {timeout:?}")]
    Timeout {
        /// Timeout duration.
        timeout: Duration,
    },

    /// The exchange broke after the connection was established.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },
}

/// Looks up a header value by name, ignoring ASCII case.
pub(crate) fn header_value<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .or_else(|| {
            headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
        })
        .map(String::as_str)
}
