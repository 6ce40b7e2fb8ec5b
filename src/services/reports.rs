//! Incident report service.

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use super::{SenderMessage, ServiceContext};
use crate::errors::SafeNestResult;
use crate::executor::RequestDescriptor;
use crate::types::{GenerateReportInput, ReportResult, Tracking};

const INCIDENT_PATH: &str = "/api/v1/reports/incident";

/// Incident report generation.
#[derive(Debug, Clone)]
pub struct ReportsService {
    ctx: ServiceContext,
}

#[derive(Serialize)]
struct ReportBody<'a> {
    messages: Vec<SenderMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<ReportMeta<'a>>,
    #[serde(flatten)]
    tracking: &'a Tracking,
}

#[derive(Serialize)]
struct ReportMeta<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    child_age: Option<u32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    incident_type: Option<&'a str>,
}

impl ReportsService {
    pub(crate) fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Returns a handle whose calls observe `cancel`.
    pub fn with_cancellation(&self, cancel: CancellationToken) -> Self {
        Self::new(self.ctx.with_cancellation(cancel))
    }

    /// Generates a professional incident report from a conversation.
    #[instrument(skip(self, input), fields(messages = input.messages.len()))]
    pub async fn generate_report(&self, input: GenerateReportInput) -> SafeNestResult<ReportResult> {
        input.validate()?;

        let incident_type = input.incident_type.as_deref();
        let meta = (input.child_age.is_some() || incident_type.is_some()).then_some(ReportMeta {
            child_age: input.child_age,
            incident_type,
        });
        let body = ReportBody {
            messages: input
                .messages
                .iter()
                .map(|m| SenderMessage {
                    sender: &m.sender,
                    text: &m.content,
                })
                .collect(),
            meta,
            tracking: &input.tracking,
        };

        self.ctx.call(RequestDescriptor::post_json(INCIDENT_PATH, &body)?).await
    }
}
