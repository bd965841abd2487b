//! Feedback records and learning patterns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A helpfulness rating given to an assistant message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub message_id: String,
    pub was_helpful: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Feedback {
    pub fn new(message_id: impl Into<String>, was_helpful: bool, comment: Option<String>) -> Self {
        Self {
            message_id: message_id.into(),
            was_helpful,
            comment,
            timestamp: Utc::now(),
        }
    }
}

/// How often a normalized question has been asked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPattern {
    /// Lowercased, trimmed question text
    pub pattern: String,
    pub frequency: u32,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl LearningPattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            pattern: pattern.into(),
            frequency: 1,
            first_seen: now,
            last_seen: now,
        }
    }

    /// Count one more occurrence.
    pub fn bump(&mut self) {
        self.frequency += 1;
        self.last_seen = Utc::now();
    }
}
