//! Enumerations exchanged with the SafeNest API.
//!
//! Each enum maps to a fixed set of wire strings. Parsing is
//! case-insensitive and total: a value the client does not know maps to the
//! enum's fallback member instead of failing the whole response.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident (fallback = $fallback:ident) {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $wire:literal $(| $alias:literal)*
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// Every member, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Returns the wire string.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            /// Parses a wire string, ignoring case. Unknown values map to
            #[doc = concat!("[`", stringify!($name), "::", stringify!($fallback), "`].")]
            pub fn from_api_str(value: &str) -> Self {
                match value.trim().to_ascii_lowercase().as_str() {
                    $($wire $(| $alias)* => $name::$variant,)+
                    _ => $name::$fallback,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$fallback
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = Option::<String>::deserialize(deserializer)?;
                Ok(raw.as_deref().map(Self::from_api_str).unwrap_or_default())
            }
        }
    };
}

wire_enum! {
    /// Severity of a detection.
    pub enum Severity (fallback = Low) {
        /// Low severity.
        Low => "low",
        /// Medium severity.
        Medium => "medium",
        /// High severity.
        High => "high",
        /// Critical severity.
        Critical => "critical",
    }
}

wire_enum! {
    /// Grooming risk assessment.
    pub enum GroomingRisk (fallback = None) {
        /// No risk found.
        None => "none",
        /// Low risk.
        Low => "low",
        /// Medium risk.
        Medium => "medium",
        /// High risk.
        High => "high",
        /// Critical risk.
        Critical => "critical",
    }
}

wire_enum! {
    /// Overall risk level.
    pub enum RiskLevel (fallback = Safe) {
        /// Nothing concerning.
        Safe => "safe",
        /// Low risk.
        Low => "low",
        /// Medium risk. The service sometimes reports this as `moderate`.
        Medium => "medium" | "moderate",
        /// High risk.
        High => "high",
        /// Critical risk.
        Critical => "critical",
    }
}

impl RiskLevel {
    /// Maps a risk score in `[0, 1]` to a level.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.9 {
            RiskLevel::Critical
        } else if score >= 0.7 {
            RiskLevel::High
        } else if score >= 0.5 {
            RiskLevel::Medium
        } else if score >= 0.3 {
            RiskLevel::Low
        } else {
            RiskLevel::Safe
        }
    }
}

wire_enum! {
    /// Category of a safety risk.
    pub enum RiskCategory (fallback = Other) {
        /// Bullying.
        Bullying => "bullying",
        /// Grooming.
        Grooming => "grooming",
        /// Unsafe content.
        Unsafe => "unsafe",
        /// Self-harm.
        SelfHarm => "self_harm",
        /// Anything else.
        Other => "other",
    }
}

wire_enum! {
    /// Kind of safety analysis.
    pub enum AnalysisType (fallback = Bullying) {
        /// Bullying detection.
        Bullying => "bullying",
        /// Grooming detection.
        Grooming => "grooming",
        /// Unsafe content detection.
        Unsafe => "unsafe",
        /// Emotion analysis.
        Emotions => "emotions",
    }
}

wire_enum! {
    /// Direction of an emotional trend.
    pub enum EmotionTrend (fallback = Stable) {
        /// Getting better.
        Improving => "improving",
        /// Unchanged.
        Stable => "stable",
        /// Getting worse.
        Worsening => "worsening",
    }
}

wire_enum! {
    /// Who an action plan is written for.
    pub enum Audience (fallback = Parent) {
        /// The child.
        Child => "child",
        /// A parent or guardian.
        Parent => "parent",
        /// School staff.
        Educator => "educator",
        /// A platform moderation team.
        Platform => "platform",
    }
}

wire_enum! {
    /// Incident tracking status.
    pub enum IncidentStatus (fallback = New) {
        /// Not yet looked at.
        New => "new",
        /// Reviewed by a person.
        Reviewed => "reviewed",
        /// Closed.
        Resolved => "resolved",
    }
}

wire_enum! {
    /// Role of a message sender in grooming detection.
    pub enum MessageRole (fallback = Unknown) {
        /// An adult.
        Adult => "adult",
        /// A child.
        Child => "child",
        /// Not known.
        Unknown => "unknown",
    }
}

wire_enum! {
    /// Webhook event types.
    pub enum WebhookEventType (fallback = IncidentCritical) {
        /// A critical incident.
        IncidentCritical => "incident.critical",
        /// A high-severity incident.
        IncidentHigh => "incident.high",
        /// Grooming was detected.
        GroomingDetected => "grooming.detected",
        /// Self-harm was detected.
        SelfHarmDetected => "self_harm.detected",
        /// Severe bullying.
        BullyingSevere => "bullying.severe",
    }
}

wire_enum! {
    /// Action recommended by a detection, ordered by urgency.
    pub enum RecommendedAction (fallback = None) {
        /// Nothing to do.
        None => "none",
        /// Keep an eye on the conversation.
        Monitor => "monitor",
        /// Escalate to a moderator.
        FlagForModerator => "flag_for_moderator",
        /// Act now.
        ImmediateIntervention => "immediate_intervention",
    }
}
