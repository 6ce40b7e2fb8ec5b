//! Safety detection inputs and results.

use serde::{Deserialize, Serialize};

use super::common::{impl_tracking, AnalysisContext, Tracking};
use super::enums::{AnalysisType, GroomingRisk, MessageRole, RecommendedAction, RiskLevel, Severity};
use super::validation::{validate_content, validate_message_count};
use crate::errors::SafeNestResult;

/// Input for bullying detection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectBullyingInput {
    /// Text to analyse.
    pub content: String,
    /// Optional analysis context.
    pub context: Option<AnalysisContext>,
    /// Correlation fields.
    pub tracking: Tracking,
}

impl DetectBullyingInput {
    /// Creates an input for the given text.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Sets the analysis context.
    pub fn with_context(mut self, context: AnalysisContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Checks the input boundaries.
    pub fn validate(&self) -> SafeNestResult<()> {
        validate_content(&self.content)
    }
}

/// Input for unsafe content detection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectUnsafeInput {
    /// Text to analyse.
    pub content: String,
    /// Optional analysis context.
    pub context: Option<AnalysisContext>,
    /// Correlation fields.
    pub tracking: Tracking,
}

impl DetectUnsafeInput {
    /// Creates an input for the given text.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Sets the analysis context.
    pub fn with_context(mut self, context: AnalysisContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Checks the input boundaries.
    pub fn validate(&self) -> SafeNestResult<()> {
        validate_content(&self.content)
    }
}

/// One message of a conversation checked for grooming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroomingMessage {
    /// Who sent the message.
    pub role: MessageRole,
    /// Message text.
    pub content: String,
}

impl GroomingMessage {
    /// Creates a message.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Input for grooming detection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectGroomingInput {
    /// Conversation, oldest first.
    pub messages: Vec<GroomingMessage>,
    /// Age of the child in the conversation.
    pub child_age: Option<u32>,
    /// Optional context. Only `platform` is sent for this endpoint.
    pub context: Option<AnalysisContext>,
    /// Correlation fields.
    pub tracking: Tracking,
}

impl DetectGroomingInput {
    /// Creates an input for the given conversation.
    pub fn new(messages: Vec<GroomingMessage>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    /// Sets the child's age.
    pub fn with_child_age(mut self, age: u32) -> Self {
        self.child_age = Some(age);
        self
    }

    /// Sets the analysis context.
    pub fn with_context(mut self, context: AnalysisContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Checks the input boundaries.
    pub fn validate(&self) -> SafeNestResult<()> {
        validate_message_count(self.messages.len())
    }
}

/// Input for the combined safety analysis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyzeInput {
    /// Text to analyse.
    pub content: String,
    /// Optional analysis context.
    pub context: Option<AnalysisContext>,
    /// Checks to run. `None` runs bullying and unsafe detection. Only
    /// [`AnalysisType::Bullying`] and [`AnalysisType::Unsafe`] apply here.
    pub include: Option<Vec<AnalysisType>>,
    /// Correlation fields, forwarded to every sub-check.
    pub tracking: Tracking,
}

impl AnalyzeInput {
    /// Creates an input for the given text.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Sets the analysis context.
    pub fn with_context(mut self, context: AnalysisContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Restricts the checks that run.
    pub fn with_include(mut self, include: Vec<AnalysisType>) -> Self {
        self.include = Some(include);
        self
    }

    /// Returns true if the given check was requested.
    pub fn includes(&self, check: AnalysisType) -> bool {
        self.include
            .as_ref()
            .map_or(matches!(check, AnalysisType::Bullying | AnalysisType::Unsafe), |list| {
                list.contains(&check)
            })
    }

    /// Checks the input boundaries.
    pub fn validate(&self) -> SafeNestResult<()> {
        validate_content(&self.content)
    }
}

impl_tracking!(DetectBullyingInput, DetectUnsafeInput, DetectGroomingInput, AnalyzeInput);

/// Result of bullying detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BullyingResult {
    /// Whether bullying was found.
    pub is_bullying: bool,
    /// Kinds of bullying found.
    pub bullying_type: Vec<String>,
    /// Model confidence in `[0, 1]`.
    pub confidence: f64,
    /// Severity exactly as the service reported it.
    #[serde(rename = "severity", deserialize_with = "null_as_empty")]
    pub severity_raw: String,
    /// Explanation.
    pub rationale: String,
    /// Suggested response.
    pub recommended_action: RecommendedAction,
    /// Risk score in `[0, 1]`.
    pub risk_score: f64,
    /// Echoed correlation fields.
    #[serde(flatten)]
    pub tracking: Tracking,
}

impl BullyingResult {
    /// Parsed severity. Values outside the table read as [`Severity::Low`].
    pub fn severity(&self) -> Severity {
        Severity::from_api_str(&self.severity_raw)
    }

    /// Severity label for display; the reported string when present.
    pub fn severity_label(&self) -> &str {
        severity_label(&self.severity_raw)
    }
}

/// Result of grooming detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroomingResult {
    /// Assessed grooming risk.
    pub grooming_risk: GroomingRisk,
    /// Patterns that raised the risk.
    pub flags: Vec<String>,
    /// Model confidence in `[0, 1]`.
    pub confidence: f64,
    /// Explanation.
    pub rationale: String,
    /// Risk score in `[0, 1]`.
    pub risk_score: f64,
    /// Suggested response.
    pub recommended_action: RecommendedAction,
    /// Echoed correlation fields.
    #[serde(flatten)]
    pub tracking: Tracking,
}

/// Result of unsafe content detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnsafeResult {
    /// Whether unsafe content was found.
    #[serde(rename = "unsafe")]
    pub is_unsafe: bool,
    /// Categories found (self-harm, violence, ...).
    pub categories: Vec<String>,
    /// Severity exactly as the service reported it.
    #[serde(rename = "severity", deserialize_with = "null_as_empty")]
    pub severity_raw: String,
    /// Model confidence in `[0, 1]`.
    pub confidence: f64,
    /// Risk score in `[0, 1]`.
    pub risk_score: f64,
    /// Explanation.
    pub rationale: String,
    /// Suggested response.
    pub recommended_action: RecommendedAction,
    /// Echoed correlation fields.
    #[serde(flatten)]
    pub tracking: Tracking,
}

impl UnsafeResult {
    /// Parsed severity. Values outside the table read as [`Severity::Low`].
    pub fn severity(&self) -> Severity {
        Severity::from_api_str(&self.severity_raw)
    }

    /// Severity label for display; the reported string when present.
    pub fn severity_label(&self) -> &str {
        severity_label(&self.severity_raw)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn severity_label(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Severity::default().as_str()
    } else {
        trimmed
    }
}

/// Composite verdict of the combined analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeResult {
    /// Level derived from `risk_score`.
    pub risk_level: RiskLevel,
    /// Highest score of the checks that ran.
    pub risk_score: f64,
    /// One-line description of the findings.
    pub summary: String,
    /// Bullying sub-result, if that check ran.
    pub bullying: Option<BullyingResult>,
    /// Unsafe sub-result, if that check ran.
    #[serde(rename = "unsafe")]
    pub unsafe_content: Option<UnsafeResult>,
    /// Most urgent action among the sub-results.
    pub recommended_action: RecommendedAction,
    /// Correlation fields from the input.
    #[serde(flatten)]
    pub tracking: Tracking,
}
