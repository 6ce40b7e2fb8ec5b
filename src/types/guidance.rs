//! Action plan inputs and results.

use serde::{Deserialize, Serialize};

use super::common::{impl_tracking, Tracking};
use super::enums::{Audience, Severity};
use crate::errors::{SafeNestError, SafeNestResult};

/// Input for action plan generation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetActionPlanInput {
    /// Description of what happened.
    pub situation: String,
    /// Age of the child involved.
    pub child_age: Option<u32>,
    /// Who the plan is written for.
    pub audience: Audience,
    /// Severity of the situation.
    pub severity: Option<Severity>,
    /// Correlation fields.
    pub tracking: Tracking,
}

impl GetActionPlanInput {
    /// Creates an input for a parent audience.
    pub fn new(situation: impl Into<String>) -> Self {
        Self {
            situation: situation.into(),
            ..Default::default()
        }
    }

    /// Sets the audience.
    pub fn with_audience(mut self, audience: Audience) -> Self {
        self.audience = audience;
        self
    }

    /// Sets the child's age.
    pub fn with_child_age(mut self, age: u32) -> Self {
        self.child_age = Some(age);
        self
    }

    /// Sets the severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Checks the input boundaries.
    pub fn validate(&self) -> SafeNestResult<()> {
        if self.situation.trim().is_empty() {
            return Err(SafeNestError::validation("Situation is required"));
        }
        Ok(())
    }
}

impl_tracking!(GetActionPlanInput);

/// Generated action plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionPlanResult {
    /// Audience the plan was written for.
    pub audience: Audience,
    /// Ordered steps.
    pub steps: Vec<String>,
    /// Tone of the plan.
    pub tone: String,
    /// Approximate reading level.
    pub approx_reading_level: Option<String>,
    /// Echoed correlation fields.
    #[serde(flatten)]
    pub tracking: Tracking,
}
