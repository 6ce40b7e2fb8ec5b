//! Retry policy implementation.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::backoff::{ExponentialBackoff, MAX_BACKOFF};
use crate::errors::{ErrorKind, SafeNestError, SafeNestResult};
use crate::observability::ClientMetrics;

/// Retry configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Base delay for exponential backoff.
    pub base_delay: Duration,
    /// Ceiling for computed backoff delays.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1_000),
            max_delay: MAX_BACKOFF,
        }
    }
}

impl RetryConfig {
    /// Creates a new retry configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of retries.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Sets the base delay.
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Sets the maximum delay.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Creates a configuration with no retries.
    pub fn no_retries() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }
}

/// Per-invocation retry bookkeeping. Never shared between calls.
#[derive(Debug, Default)]
struct RetryState {
    attempt: u32,
    last_error: Option<SafeNestError>,
}

impl RetryState {
    fn advance(&mut self, error: SafeNestError) {
        self.last_error = Some(error);
        self.attempt += 1;
    }
}

/// Bounded retry loop with exponential backoff.
///
/// Rate-limit failures wait for the server's retry-after hint when one is
/// present. Every wait is raced against the caller's cancellation token.
#[derive(Debug)]
pub struct RetryPolicy {
    config: RetryConfig,
    backoff: ExponentialBackoff,
    metrics: Option<Arc<ClientMetrics>>,
}

impl RetryPolicy {
    /// Creates a new retry policy.
    pub fn new(config: RetryConfig) -> Self {
        let backoff = ExponentialBackoff::new(config.base_delay).with_max_delay(config.max_delay);
        Self {
            config,
            backoff,
            metrics: None,
        }
    }

    /// Records retries into the given metrics.
    pub fn with_metrics(mut self, metrics: Arc<ClientMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Runs `operation` until it succeeds, fails terminally, or the retry
    /// budget is spent. The closure receives the 0-based attempt number.
    ///
    /// At most `max_retries + 1` attempts are made. A cancelled token ends
    /// the run with a cancellation error, including while waiting between
    /// attempts.
    pub async fn run<F, Fut, T>(
        &self,
        cancel: &CancellationToken,
        mut operation: F,
    ) -> SafeNestResult<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = SafeNestResult<T>>,
    {
        let mut state = RetryState::default();

        loop {
            let err = match operation(state.attempt).await {
                Ok(value) => {
                    if let Some(previous) = &state.last_error {
                        tracing::debug!(
                            attempts = state.attempt + 1,
                            recovered_from = %previous.kind(),
                            "Request succeeded after retry"
                        );
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            if err.is_cancelled() {
                return Err(err);
            }

            if !err.is_retryable() || state.attempt >= self.config.max_retries {
                tracing::warn!(
                    attempts = state.attempt + 1,
                    kind = %err.kind(),
                    error = %err,
                    "Request failed"
                );
                return Err(err);
            }

            let delay = self.delay_for(state.attempt, &err);

            tracing::info!(
                attempt = state.attempt + 1,
                max_retries = self.config.max_retries,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Retrying after error"
            );
            if let Some(metrics) = &self.metrics {
                metrics.record_retry();
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(attempt = state.attempt + 1, "Cancelled during backoff");
                    return Err(SafeNestError::cancelled());
                }
                _ = tokio::time::sleep(delay) => {}
            }

            state.advance(err);
        }
    }

    /// Calculates the wait before the next attempt.
    fn delay_for(&self, attempt: u32, error: &SafeNestError) -> Duration {
        if error.kind() == ErrorKind::RateLimit {
            if let Some(retry_after) = error.retry_after() {
                return retry_after;
            }
        }
        self.backoff.delay(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}
