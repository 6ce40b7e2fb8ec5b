//! Resilience layer for the SafeNest client.
//!
//! Provides the backoff calculator and the bounded, cancellable retry loop
//! that wraps every request.

mod backoff;
mod retry;

pub use backoff::{ExponentialBackoff, MAX_BACKOFF};
pub use retry::{RetryConfig, RetryPolicy};
