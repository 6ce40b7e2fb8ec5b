//! Types shared by several endpoints.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Caller-defined key/value pairs echoed back on results.
pub type Metadata = HashMap<String, serde_json::Value>;

/// Optional context that sharpens an analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisContext {
    /// Language of the content (e.g. `en`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Age group of the child (e.g. `11-13`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_group: Option<String>,
    /// Relationship between the participants.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    /// Platform the content comes from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl AnalysisContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the age group.
    pub fn with_age_group(mut self, age_group: impl Into<String>) -> Self {
        self.age_group = Some(age_group.into());
        self
    }

    /// Sets the relationship.
    pub fn with_relationship(mut self, relationship: impl Into<String>) -> Self {
        self.relationship = Some(relationship.into());
        self
    }

    /// Sets the platform.
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.language.is_none()
            && self.age_group.is_none()
            && self.relationship.is_none()
            && self.platform.is_none()
    }
}

/// Correlation fields sent with a request and echoed on its result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tracking {
    /// Caller's id for the analysed item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Caller's id for their end customer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Adds tracking builder methods to an input type with a `tracking` field.
macro_rules! impl_tracking {
    ($($input:ty),+ $(,)?) => {
        $(
            impl $input {
                /// Sets the external id echoed on the result.
                pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
                    self.tracking.external_id = Some(external_id.into());
                    self
                }

                /// Sets the customer id echoed on the result.
                pub fn with_customer_id(mut self, customer_id: impl Into<String>) -> Self {
                    self.tracking.customer_id = Some(customer_id.into());
                    self
                }

                /// Sets metadata echoed on the result.
                pub fn with_metadata(mut self, metadata: $crate::types::Metadata) -> Self {
                    self.tracking.metadata = Some(metadata);
                    self
                }
            }
        )+
    };
}

pub(crate) use impl_tracking;
