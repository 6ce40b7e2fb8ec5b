//! Request metrics for a client instance.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use crate::errors::ErrorKind;

/// Point-in-time copy of a client's counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Completed or failed HTTP exchanges, retries included.
    pub requests: u64,
    /// Exchanges that returned a 2xx status.
    pub successes: u64,
    /// Exchanges that failed, for any reason.
    pub failures: u64,
    /// Retries scheduled by the retry policy.
    pub retries: u64,
    /// Sum of exchange latencies in milliseconds.
    pub total_latency_ms: u64,
    /// Failure counts by kind.
    pub errors: HashMap<ErrorKind, u64>,
}

impl MetricsSnapshot {
    /// Average exchange latency in milliseconds.
    pub fn average_latency_ms(&self) -> f64 {
        if self.requests == 0 {
            0.0
        } else {
            self.total_latency_ms as f64 / self.requests as f64
        }
    }

    /// Success rate as a percentage.
    pub fn success_rate(&self) -> f64 {
        if self.requests == 0 {
            100.0
        } else {
            (self.successes as f64 / self.requests as f64) * 100.0
        }
    }

    /// Returns the failure count for a kind.
    pub fn errors_of(&self, kind: ErrorKind) -> u64 {
        self.errors.get(&kind).copied().unwrap_or(0)
    }
}

/// Lock-free request counters shared by the executor and retry policy.
#[derive(Default)]
pub struct ClientMetrics {
    requests: AtomicU64,
    successes: AtomicU64,
    failures: AtomicU64,
    retries: AtomicU64,
    total_latency_ms: AtomicU64,
    errors: RwLock<HashMap<ErrorKind, u64>>,
}

impl ClientMetrics {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful exchange.
    pub fn record_success(&self, latency: Duration) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.successes.fetch_add(1, Ordering::Relaxed);
        self.add_latency(latency);
    }

    /// Records a failed exchange.
    pub fn record_failure(&self, kind: ErrorKind, latency: Duration) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.failures.fetch_add(1, Ordering::Relaxed);
        self.add_latency(latency);

        if let Ok(mut errors) = self.errors.write() {
            *errors.entry(kind).or_insert(0) += 1;
        }
    }

    /// Records a scheduled retry.
    pub fn record_retry(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    fn add_latency(&self, latency: Duration) {
        let ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.total_latency_ms.fetch_add(ms, Ordering::Relaxed);
    }

    /// Returns the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            total_latency_ms: self.total_latency_ms.load(Ordering::Relaxed),
            errors: self.errors.read().map(|e| e.clone()).unwrap_or_default(),
        }
    }

    /// Zeroes every counter.
    pub fn reset(&self) {
        self.requests.store(0, Ordering::Relaxed);
        self.successes.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
        self.retries.store(0, Ordering::Relaxed);
        self.total_latency_ms.store(0, Ordering::Relaxed);

        if let Ok(mut errors) = self.errors.write() {
            errors.clear();
        }
    }
}

impl std::fmt::Debug for ClientMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientMetrics")
            .field("requests", &self.requests.load(Ordering::Relaxed))
            .field("failures", &self.failures.load(Ordering::Relaxed))
            .field("retries", &self.retries.load(Ordering::Relaxed))
            .finish()
    }
}
