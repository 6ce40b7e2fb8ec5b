//! Input boundary checks, applied before any request is sent.

use crate::errors::{SafeNestError, SafeNestResult};

/// Longest accepted text content, in characters.
pub const MAX_CONTENT_LENGTH: usize = 50_000;

/// Largest accepted message list.
pub const MAX_MESSAGES: usize = 100;

/// Checks that text content is present and within the length limit.
pub fn validate_content(content: &str) -> SafeNestResult<()> {
    if content.is_empty() {
        return Err(SafeNestError::validation("Content is required"));
    }
    if content.chars().count() > MAX_CONTENT_LENGTH {
        return Err(SafeNestError::validation(format!(
            "Content exceeds maximum length of {} characters",
            MAX_CONTENT_LENGTH
        )));
    }
    Ok(())
}

/// Checks that a message list is non-empty and within the count limit.
pub fn validate_message_count(count: usize) -> SafeNestResult<()> {
    if count == 0 {
        return Err(SafeNestError::validation("At least one message is required"));
    }
    if count > MAX_MESSAGES {
        return Err(SafeNestError::validation(format!(
            "Messages exceed maximum count of {}",
            MAX_MESSAGES
        )));
    }
    Ok(())
}
