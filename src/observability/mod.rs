//! Observability for the SafeNest client.
//!
//! Request counters live on every client instance. Logging goes through
//! `tracing`; [`init_logging`] installs a subscriber for applications that
//! do not bring their own.

mod logging;
mod metrics;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
pub use metrics::{ClientMetrics, MetricsSnapshot};
