//! Incident report inputs and results.

use serde::{Deserialize, Serialize};

use super::common::{impl_tracking, Tracking};
use super::enums::RiskLevel;
use super::validation::validate_message_count;
use crate::errors::SafeNestResult;

/// One message of the conversation an incident report covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportMessage {
    /// Sender label (free-form).
    pub sender: String,
    /// Message text.
    pub content: String,
}

impl ReportMessage {
    /// Creates a message.
    pub fn new(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
        }
    }
}

/// Input for incident report generation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateReportInput {
    /// Conversation, oldest first.
    pub messages: Vec<ReportMessage>,
    /// Age of the child involved.
    pub child_age: Option<u32>,
    /// Free-form incident type (e.g. `bullying`).
    pub incident_type: Option<String>,
    /// Correlation fields.
    pub tracking: Tracking,
}

impl GenerateReportInput {
    /// Creates an input for the given conversation.
    pub fn new(messages: Vec<ReportMessage>) -> Self {
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

    /// Sets the incident type.
    pub fn with_incident_type(mut self, incident_type: impl Into<String>) -> Self {
        self.incident_type = Some(incident_type.into());
        self
    }

    /// Checks the input boundaries.
    pub fn validate(&self) -> SafeNestResult<()> {
        validate_message_count(self.messages.len())
    }
}

impl_tracking!(GenerateReportInput);

/// Generated incident report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportResult {
    /// Narrative summary.
    pub summary: String,
    /// Assessed risk level.
    pub risk_level: RiskLevel,
    /// Risk categories involved.
    pub categories: Vec<String>,
    /// Suggested next steps.
    pub recommended_next_steps: Vec<String>,
    /// Echoed correlation fields.
    #[serde(flatten)]
    pub tracking: Tracking,
}
