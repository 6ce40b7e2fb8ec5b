//! Client-wide metadata published after every exchange.

use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::Duration;

use super::{RateLimitSnapshot, ResponseMetadata, UsageSnapshot};

/// Last observed response metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientMetadata {
    /// Last complete usage snapshot.
    pub usage: Option<UsageSnapshot>,
    /// Last complete rate-limit snapshot.
    pub rate_limit: Option<RateLimitSnapshot>,
    /// Usage warning from the most recent response.
    pub usage_warning: Option<String>,
    /// Request id of the most recent response.
    pub last_request_id: Option<String>,
    /// Round-trip time of the most recent exchange.
    pub last_latency: Option<Duration>,
}

/// Shared metadata cell. Readers never block writers; the last publish wins.
#[derive(Debug, Default)]
pub struct MetadataState {
    current: ArcSwap<ClientMetadata>,
}

impl MetadataState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current metadata.
    pub fn snapshot(&self) -> Arc<ClientMetadata> {
        self.current.load_full()
    }

    /// Publishes the metadata of a completed exchange.
    ///
    /// Request id, usage warning and latency are always replaced. Usage and
    /// rate-limit snapshots are replaced only when the response carried a
    /// complete one.
    pub fn publish(&self, parsed: &ResponseMetadata, latency: Duration) {
        self.current.rcu(|previous| ClientMetadata {
            usage: parsed.usage.or(previous.usage),
            rate_limit: parsed.rate_limit.or(previous.rate_limit),
            usage_warning: parsed.usage_warning.clone(),
            last_request_id: parsed.request_id.clone(),
            last_latency: Some(latency),
        });

        if let Some(warning) = &parsed.usage_warning {
            tracing::warn!(warning = %warning, "SafeNest usage warning");
        }
        tracing::debug!(
            request_id = parsed.request_id.as_deref().unwrap_or("-"),
            latency_ms = latency.as_millis() as u64,
            usage_remaining = parsed.usage.map(|u| u.remaining),
            rate_limit_remaining = parsed.rate_limit.map(|r| r.remaining),
            "Updated response metadata"
        );
    }
}
