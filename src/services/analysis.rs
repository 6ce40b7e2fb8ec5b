//! Emotion analysis service.

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use super::{SenderMessage, ServiceContext};
use crate::errors::SafeNestResult;
use crate::executor::RequestDescriptor;
use crate::types::{AnalysisContext, AnalyzeEmotionsInput, EmotionsResult, Tracking};

const EMOTIONS_PATH: &str = "/api/v1/analysis/emotions";

/// Emotion analysis over text or conversations.
#[derive(Debug, Clone)]
pub struct AnalysisService {
    ctx: ServiceContext,
}

#[derive(Serialize)]
struct EmotionsBody<'a> {
    messages: Vec<SenderMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a AnalysisContext>,
    #[serde(flatten)]
    tracking: &'a Tracking,
}

impl AnalysisService {
    pub(crate) fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Returns a handle whose calls observe `cancel`.
    pub fn with_cancellation(&self, cancel: CancellationToken) -> Self {
        Self::new(self.ctx.with_cancellation(cancel))
    }

    /// Analyses the emotions expressed in a text or conversation.
    #[instrument(skip(self, input))]
    pub async fn analyze_emotions(&self, input: AnalyzeEmotionsInput) -> SafeNestResult<EmotionsResult> {
        input.validate()?;

        let messages = input.effective_messages();
        let body = EmotionsBody {
            messages: messages
                .iter()
                .map(|m| SenderMessage {
                    sender: &m.sender,
                    text: &m.content,
                })
                .collect(),
            context: input.context.as_ref().filter(|c| !c.is_empty()),
            tracking: &input.tracking,
        };

        self.ctx.call(RequestDescriptor::post_json(EMOTIONS_PATH, &body)?).await
    }
}
