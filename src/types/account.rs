//! Account data management results.

use serde::{Deserialize, Serialize};

/// Result of deleting all account data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountDeletionResult {
    /// Confirmation message.
    pub message: String,
    /// Number of records removed.
    pub deleted_count: u64,
}

/// Result of exporting all account data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountExportResult {
    /// Account owner id.
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Export timestamp as sent by the service.
    #[serde(rename = "exportedAt")]
    pub exported_at: String,
    /// Exported records.
    pub data: Option<serde_json::Map<String, serde_json::Value>>,
}

impl AccountExportResult {
    /// Parses `exported_at` as an RFC 3339 timestamp.
    pub fn exported_at_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::parse_from_rfc3339(&self.exported_at)
            .ok()
            .map(|t| t.with_timezone(&chrono::Utc))
    }
}
