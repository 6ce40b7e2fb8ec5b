//! Response metadata extraction.
//!
//! Every SafeNest response carries quota information in its headers. The
//! parser here is pure; publication into the client's shared state lives in
//! [`MetadataState`].

mod state;

pub use state::{ClientMetadata, MetadataState};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::transport::header_value;

/// Monthly usage quota, as last reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// Monthly request allowance.
    pub limit: u64,
    /// Requests consumed this month.
    pub used: u64,
    /// Requests left this month, as reported.
    pub remaining: u64,
}

/// Per-minute rate limit, as last reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitSnapshot {
    /// Requests allowed per window.
    pub limit: u64,
    /// Requests left in the current window.
    pub remaining: u64,
    /// Window reset time in Unix epoch seconds.
    pub reset: Option<i64>,
}

impl RateLimitSnapshot {
    /// Returns the reset time as a UTC timestamp.
    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        self.reset.and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    }
}

/// Metadata parsed from one response's headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
    /// Server-assigned request id (`x-request-id`).
    pub request_id: Option<String>,
    /// Usage quota, present only when all three headers parse.
    pub usage: Option<UsageSnapshot>,
    /// Rate limit, present only when limit and remaining parse.
    pub rate_limit: Option<RateLimitSnapshot>,
    /// Quota warning (`x-usage-warning`).
    pub usage_warning: Option<String>,
}

impl ResponseMetadata {
    /// Parses response headers. Header names are matched case-insensitively;
    /// missing or malformed headers leave the corresponding field unset.
    pub fn from_headers(headers: &HashMap<String, String>) -> Self {
        let number = |name: &str| header_value(headers, name).and_then(|v| v.trim().parse::<u64>().ok());
        let text = |name: &str| header_value(headers, name).map(str::to_string);

        let usage = match (
            number("x-monthly-limit"),
            number("x-monthly-used"),
            number("x-monthly-remaining"),
        ) {
            (Some(limit), Some(used), Some(remaining)) => Some(UsageSnapshot {
                limit,
                used,
                remaining,
            }),
            _ => None,
        };

        let rate_limit = match (number("x-ratelimit-limit"), number("x-ratelimit-remaining")) {
            (Some(limit), Some(remaining)) => Some(RateLimitSnapshot {
                limit,
                remaining,
                reset: header_value(headers, "x-ratelimit-reset")
                    .and_then(|v| v.trim().parse::<i64>().ok()),
            }),
            _ => None,
        };

        Self {
            request_id: text("x-request-id"),
            usage,
            rate_limit,
            usage_warning: text("x-usage-warning"),
        }
    }
}
