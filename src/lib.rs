//! SafeNest Client Library
//!
//! An async Rust client for the SafeNest child-safety API. Detects
//! bullying, grooming and unsafe content, analyses emotions, and produces
//! action plans and incident reports.
//!
//! # Features
//!
//! - **Safety detection**: bullying, grooming and unsafe content, plus a
//!   combined analysis that runs checks concurrently
//! - **Resilience**: bounded retries with exponential backoff and
//!   server-directed rate-limit waits
//! - **Cancellation**: every call can be bound to a `CancellationToken`
//! - **Usage tracking**: quota and rate-limit headers are exposed on the client
//! - **Observability**: `tracing` spans and events, request metrics
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use safenest_client::{AnalyzeInput, SafeNestClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SafeNestClient::builder()
//!         .api_key("sn_your_api_key")
//!         .build()?;
//!
//!     let result = client
//!         .safety()
//!         .analyze(AnalyzeInput::new("meet me after school, don't tell anyone"))
//!         .await?;
//!
//!     println!("{} ({:.2}): {}", result.risk_level, result.risk_score, result.summary);
//!     if let Some(usage) = client.usage() {
//!         println!("{} of {} requests left this month", usage.remaining, usage.limit);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Cancellation
//!
//! ```rust,no_run
//! use safenest_client::{DetectUnsafeInput, SafeNestClient};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SafeNestClient::from_env()?;
//!     let cancel = CancellationToken::new();
//!
//!     let safety = client.safety().with_cancellation(cancel.clone());
//!     let call = tokio::spawn(async move {
//!         safety.detect_unsafe(DetectUnsafeInput::new("some text")).await
//!     });
//!
//!     cancel.cancel();
//!     if let Err(err) = call.await? {
//!         assert!(err.is_cancelled());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod executor;
pub mod metadata;
pub mod observability;
pub mod resilience;
pub mod services;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use client::{SafeNestClient, SafeNestClientBuilder};
pub use config::SafeNestConfig;
pub use errors::{ErrorKind, SafeNestError, SafeNestResult};
pub use metadata::{ClientMetadata, RateLimitSnapshot, UsageSnapshot};
pub use observability::{init_logging, LogConfig, LogFormat, LogLevel, MetricsSnapshot};
pub use services::{AccountService, AnalysisService, GuidanceService, ReportsService, SafetyService};

// Type re-exports
pub use types::{
    AccountDeletionResult, AccountExportResult, ActionPlanResult, AnalysisContext, AnalysisType,
    AnalyzeEmotionsInput, AnalyzeInput, AnalyzeResult, Audience, BullyingResult,
    DetectBullyingInput, DetectGroomingInput, DetectUnsafeInput, EmotionMessage, EmotionTrend,
    EmotionsResult, GenerateReportInput, GetActionPlanInput, GroomingMessage, GroomingResult,
    GroomingRisk, IncidentStatus, MessageRole, Metadata, RecommendedAction, ReportMessage,
    ReportResult, RiskCategory, RiskLevel, Severity, Tracking, UnsafeResult, WebhookEventType,
    MAX_CONTENT_LENGTH, MAX_MESSAGES,
};

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use tokio_util::sync::CancellationToken;
