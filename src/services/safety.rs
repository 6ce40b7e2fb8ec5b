//! Safety detection service.

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use super::ServiceContext;
use crate::errors::SafeNestResult;
use crate::executor::RequestDescriptor;
use crate::types::{
    AnalysisContext, AnalysisType, AnalyzeInput, AnalyzeResult, BullyingResult, DetectBullyingInput,
    DetectGroomingInput, DetectUnsafeInput, GroomingResult, MessageRole, RecommendedAction, RiskLevel,
    Tracking, UnsafeResult,
};

const BULLYING_PATH: &str = "/api/v1/safety/bullying";
const GROOMING_PATH: &str = "/api/v1/safety/grooming";
const UNSAFE_PATH: &str = "/api/v1/safety/unsafe";

const NO_CONCERNS: &str = "No safety concerns detected.";

/// Bullying, grooming and unsafe content detection.
#[derive(Debug, Clone)]
pub struct SafetyService {
    ctx: ServiceContext,
}

#[derive(Serialize)]
struct TextBody<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a AnalysisContext>,
    #[serde(flatten)]
    tracking: &'a Tracking,
}

impl<'a> TextBody<'a> {
    fn new(text: &'a str, context: Option<&'a AnalysisContext>, tracking: &'a Tracking) -> Self {
        Self {
            text,
            context: context.filter(|c| !c.is_empty()),
            tracking,
        }
    }
}

#[derive(Serialize)]
struct GroomingBody<'a> {
    messages: Vec<RoleMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<GroomingContext<'a>>,
    #[serde(flatten)]
    tracking: &'a Tracking,
}

#[derive(Serialize)]
struct RoleMessage<'a> {
    sender_role: MessageRole,
    text: &'a str,
}

#[derive(Serialize)]
struct GroomingContext<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    child_age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    platform: Option<&'a str>,
}

impl SafetyService {
    pub(crate) fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Returns a handle whose calls observe `cancel`.
    pub fn with_cancellation(&self, cancel: CancellationToken) -> Self {
        Self::new(self.ctx.with_cancellation(cancel))
    }

    /// Detects bullying in a piece of text.
    #[instrument(skip(self, input))]
    pub async fn detect_bullying(&self, input: DetectBullyingInput) -> SafeNestResult<BullyingResult> {
        input.validate()?;
        let body = TextBody::new(&input.content, input.context.as_ref(), &input.tracking);
        self.ctx.call(RequestDescriptor::post_json(BULLYING_PATH, &body)?).await
    }

    /// Detects grooming patterns in a conversation.
    #[instrument(skip(self, input), fields(messages = input.messages.len()))]
    pub async fn detect_grooming(&self, input: DetectGroomingInput) -> SafeNestResult<GroomingResult> {
        input.validate()?;

        let platform = input.context.as_ref().and_then(|c| c.platform.as_deref());
        let context = (input.child_age.is_some() || platform.is_some()).then_some(GroomingContext {
            child_age: input.child_age,
            platform,
        });
        let body = GroomingBody {
            messages: input
                .messages
                .iter()
                .map(|m| RoleMessage {
                    sender_role: m.role,
                    text: &m.content,
                })
                .collect(),
            context,
            tracking: &input.tracking,
        };

        self.ctx.call(RequestDescriptor::post_json(GROOMING_PATH, &body)?).await
    }

    /// Detects unsafe content (self-harm, violence, hate speech, ...).
    #[instrument(skip(self, input))]
    pub async fn detect_unsafe(&self, input: DetectUnsafeInput) -> SafeNestResult<UnsafeResult> {
        input.validate()?;
        let body = TextBody::new(&input.content, input.context.as_ref(), &input.tracking);
        self.ctx.call(RequestDescriptor::post_json(UNSAFE_PATH, &body)?).await
    }

    /// Runs bullying and unsafe detection concurrently and combines them.
    ///
    /// If either check fails the whole analysis fails with that error and
    /// the other check is abandoned.
    #[instrument(skip(self, input))]
    pub async fn analyze(&self, input: AnalyzeInput) -> SafeNestResult<AnalyzeResult> {
        input.validate()?;

        let bullying_check = input.includes(AnalysisType::Bullying).then(|| DetectBullyingInput {
            content: input.content.clone(),
            context: input.context.clone(),
            tracking: input.tracking.clone(),
        });
        let unsafe_check = input.includes(AnalysisType::Unsafe).then(|| DetectUnsafeInput {
            content: input.content.clone(),
            context: input.context.clone(),
            tracking: input.tracking.clone(),
        });

        let (bullying, unsafe_content) = tokio::try_join!(
            async {
                match bullying_check {
                    Some(check) => self.detect_bullying(check).await.map(Some),
                    None => Ok(None),
                }
            },
            async {
                match unsafe_check {
                    Some(check) => self.detect_unsafe(check).await.map(Some),
                    None => Ok(None),
                }
            },
        )?;

        Ok(combine(bullying, unsafe_content, input.tracking))
    }

    /// Shorthand for [`analyze`](Self::analyze) with default checks.
    pub async fn analyze_text(
        &self,
        content: impl Into<String>,
        context: Option<AnalysisContext>,
    ) -> SafeNestResult<AnalyzeResult> {
        let mut input = AnalyzeInput::new(content);
        input.context = context;
        self.analyze(input).await
    }
}

/// Folds the sub-results into one verdict.
fn combine(
    bullying: Option<BullyingResult>,
    unsafe_content: Option<UnsafeResult>,
    tracking: Tracking,
) -> AnalyzeResult {
    let risk_score = bullying
        .as_ref()
        .map_or(0.0, |b| b.risk_score)
        .max(unsafe_content.as_ref().map_or(0.0, |u| u.risk_score));

    let mut findings = Vec::new();
    if let Some(b) = bullying.as_ref().filter(|b| b.is_bullying) {
        findings.push(format!("Bullying detected ({})", b.severity_label()));
    }
    if let Some(u) = unsafe_content.as_ref().filter(|u| u.is_unsafe) {
        findings.push(format!("Unsafe content: {}", u.categories.join(", ")));
    }
    let summary = if findings.is_empty() {
        NO_CONCERNS.to_string()
    } else {
        findings.join(". ")
    };

    let recommended_action = bullying
        .as_ref()
        .map(|b| b.recommended_action)
        .into_iter()
        .chain(unsafe_content.as_ref().map(|u| u.recommended_action))
        .max()
        .unwrap_or(RecommendedAction::None);

    AnalyzeResult {
        risk_level: RiskLevel::from_score(risk_score),
        risk_score,
        summary,
        bullying,
        unsafe_content,
        recommended_action,
        tracking,
    }
}
