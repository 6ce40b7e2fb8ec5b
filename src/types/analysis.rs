//! Emotion analysis inputs and results.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::common::{impl_tracking, AnalysisContext, Tracking};
use super::enums::EmotionTrend;
use super::validation::{validate_content, validate_message_count};
use crate::errors::{SafeNestError, SafeNestResult};

/// One message of a conversation for emotion analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmotionMessage {
    /// Sender label (free-form).
    pub sender: String,
    /// Message text.
    pub content: String,
}

impl EmotionMessage {
    /// Creates a message.
    pub fn new(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
        }
    }
}

/// Input for emotion analysis. Give either `content` or `messages`; when
/// both are present the messages win.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyzeEmotionsInput {
    /// Single piece of text, sent as one message from `user`.
    pub content: Option<String>,
    /// Conversation, oldest first.
    pub messages: Option<Vec<EmotionMessage>>,
    /// Optional analysis context.
    pub context: Option<AnalysisContext>,
    /// Correlation fields.
    pub tracking: Tracking,
}

impl AnalyzeEmotionsInput {
    /// Creates an input for a single piece of text.
    pub fn from_content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Creates an input for a conversation.
    pub fn from_messages(messages: Vec<EmotionMessage>) -> Self {
        Self {
            messages: Some(messages),
            ..Default::default()
        }
    }

    /// Sets the analysis context.
    pub fn with_context(mut self, context: AnalysisContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Returns the messages that will be sent.
    pub(crate) fn effective_messages(&self) -> Vec<EmotionMessage> {
        match (&self.messages, &self.content) {
            (Some(messages), _) if !messages.is_empty() => messages.clone(),
            (_, Some(content)) if !content.is_empty() => vec![EmotionMessage::new("user", content.clone())],
            _ => Vec::new(),
        }
    }

    /// Checks the input boundaries.
    pub fn validate(&self) -> SafeNestResult<()> {
        match (&self.messages, &self.content) {
            (Some(messages), _) if !messages.is_empty() => validate_message_count(messages.len()),
            (_, Some(content)) if !content.is_empty() => validate_content(content),
            _ => Err(SafeNestError::validation("Either content or messages is required")),
        }
    }
}

impl_tracking!(AnalyzeEmotionsInput);

/// Result of emotion analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionsResult {
    /// Strongest emotions, strongest first.
    pub dominant_emotions: Vec<String>,
    /// Score per emotion.
    pub emotion_scores: Option<HashMap<String, f64>>,
    /// Direction across the conversation.
    pub trend: EmotionTrend,
    /// Plain-language summary.
    pub summary: String,
    /// Suggested follow-up.
    pub recommended_followup: String,
    /// Echoed correlation fields.
    #[serde(flatten)]
    pub tracking: Tracking,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MAX_MESSAGES;

    #[test]
    fn test_content_becomes_user_message() {
        let input = AnalyzeEmotionsInput::from_content("I feel left out");
        assert_eq!(
            input.effective_messages(),
            vec![EmotionMessage::new("user", "I feel left out")]
        );
    }

    #[test]
    fn test_messages_take_precedence() {
        let input = AnalyzeEmotionsInput {
            content: Some("ignored".into()),
            messages: Some(vec![EmotionMessage::new("child", "hi")]),
            ..Default::default()
        };
        assert_eq!(input.effective_messages()[0].sender, "child");
    }

    #[test]
    fn test_validation() {
        assert!(AnalyzeEmotionsInput::default().validate().is_err());
        assert!(AnalyzeEmotionsInput::from_content("").validate().is_err());
        assert!(AnalyzeEmotionsInput::from_messages(Vec::new()).validate().is_err());
        assert!(AnalyzeEmotionsInput::from_content("sad").validate().is_ok());

        let too_many = vec![EmotionMessage::new("a", "b"); MAX_MESSAGES + 1];
        assert!(AnalyzeEmotionsInput::from_messages(too_many).validate().is_err());
    }

    #[test]
    fn test_trend_fallback() {
        let result: EmotionsResult = serde_json::from_str(r#"{"trend":"sideways"}"#).unwrap();
        assert_eq!(result.trend, EmotionTrend::Stable);
    }
}
