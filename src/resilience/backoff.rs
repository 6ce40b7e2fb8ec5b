//! Exponential backoff with bounded jitter.

use rand::Rng;
use std::time::Duration;

/// Upper bound for any computed backoff delay.
pub const MAX_BACKOFF: Duration = Duration::from_millis(30_000);

/// Exponential backoff calculator.
///
/// The delay for attempt `n` is `base * 2^n`, plus a uniform jitter in
/// `[0, 0.25 * delay)`, clamped to the configured ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    base_delay: Duration,
    max_delay: Duration,
}

impl ExponentialBackoff {
    /// Creates a calculator with the default 30 second ceiling.
    pub fn new(base_delay: Duration) -> Self {
        Self {
            base_delay,
            max_delay: MAX_BACKOFF,
        }
    }

    /// Sets the ceiling.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Returns the base delay.
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Returns the ceiling.
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Computes the delay for a 0-based attempt using the thread-local RNG.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.delay_with_rng(attempt, &mut rand::thread_rng())
    }

    /// Computes the delay for a 0-based attempt using the given RNG.
    pub fn delay_with_rng<R: Rng + ?Sized>(&self, attempt: u32, rng: &mut R) -> Duration {
        let base_ms = u64::try_from(self.base_delay.as_millis()).unwrap_or(u64::MAX);
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        let delay_ms = base_ms.saturating_mul(factor);

        // floor(0.25 * delay); an empty range means no jitter
        let jitter_bound = delay_ms / 4;
        let jitter_ms = if jitter_bound == 0 {
            0
        } else {
            rng.gen_range(0..jitter_bound)
        };

        let max_ms = u64::try_from(self.max_delay.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(delay_ms.saturating_add(jitter_ms).min(max_ms))
    }
}
