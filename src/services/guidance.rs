//! Guidance service.

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use super::ServiceContext;
use crate::errors::SafeNestResult;
use crate::executor::RequestDescriptor;
use crate::types::{ActionPlanResult, Audience, GetActionPlanInput, Severity, Tracking};

const ACTION_PLAN_PATH: &str = "/api/v1/guidance/action-plan";

/// Age-appropriate action plans.
#[derive(Debug, Clone)]
pub struct GuidanceService {
    ctx: ServiceContext,
}

#[derive(Serialize)]
struct ActionPlanBody<'a> {
    role: Audience,
    situation: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    child_age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    severity: Option<Severity>,
    #[serde(flatten)]
    tracking: &'a Tracking,
}

impl GuidanceService {
    pub(crate) fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Returns a handle whose calls observe `cancel`.
    pub fn with_cancellation(&self, cancel: CancellationToken) -> Self {
        Self::new(self.ctx.with_cancellation(cancel))
    }

    /// Generates an action plan for the given audience.
    #[instrument(skip(self, input), fields(audience = %input.audience))]
    pub async fn get_action_plan(&self, input: GetActionPlanInput) -> SafeNestResult<ActionPlanResult> {
        input.validate()?;

        let body = ActionPlanBody {
            role: input.audience,
            situation: &input.situation,
            child_age: input.child_age,
            severity: input.severity,
            tracking: &input.tracking,
        };

        self.ctx.call(RequestDescriptor::post_json(ACTION_PLAN_PATH, &body)?).await
    }
}
