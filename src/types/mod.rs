//! Request and response types for the SafeNest API.

mod account;
mod analysis;
mod common;
mod enums;
mod guidance;
mod reports;
mod safety;
mod validation;

pub use account::{AccountDeletionResult, AccountExportResult};
pub use analysis::{AnalyzeEmotionsInput, EmotionMessage, EmotionsResult};
pub use common::{AnalysisContext, Metadata, Tracking};
pub use enums::{
    AnalysisType, Audience, EmotionTrend, GroomingRisk, IncidentStatus, MessageRole,
    RecommendedAction, RiskCategory, RiskLevel, Severity, WebhookEventType,
};
pub use guidance::{ActionPlanResult, GetActionPlanInput};
pub use reports::{GenerateReportInput, ReportMessage, ReportResult};
pub use safety::{
    AnalyzeInput, AnalyzeResult, BullyingResult, DetectBullyingInput, DetectGroomingInput, DetectUnsafeInput,
    GroomingMessage, GroomingResult, UnsafeResult,
};
pub use validation::{validate_content, validate_message_count, MAX_CONTENT_LENGTH, MAX_MESSAGES};
