//! Message and Conversation domain types.
//!
//! These are the value objects persisted by the conversation store:
//! user asks → message appended → knowledge lookup answers → assistant message appended.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier grouping the conversations of one session (no login involved).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(prefixed_id("session"))
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generate an id of the form `<prefix>_<uuid>`.
pub fn prefixed_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person asking
    User,
    /// DAVE
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message in a conversation. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// Timestamp
    pub timestamp: DateTime<Utc>,

    /// Knowledge entry that produced this answer (assistant messages only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_base_id: Option<String>,
}

impl Message {
    /// Create a message with a fresh id and the current time.
    pub fn new(role: Role, content: impl Into<String>, knowledge_base_id: Option<String>) -> Self {
        Self {
            id: prefixed_id("msg"),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            knowledge_base_id,
        }
    }
}

/// An ordered, append-only sequence of messages belonging to one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique conversation ID
    pub id: String,

    /// Session that created the conversation
    pub session_id: SessionId,

    /// Ordered messages
    #[serde(default)]
    pub messages: Vec<Message>,

    /// When this conversation was created
    pub started_at: DateTime<Utc>,

    /// When the last message was added
    pub last_activity_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new empty conversation for a session.
    pub fn new(session_id: SessionId) -> Self {
        let now = Utc::now();
        Self {
            id: prefixed_id("conv"),
            session_id,
            messages: Vec::new(),
            started_at: now,
            last_activity_at: now,
        }
    }

    /// Add a message to the conversation.
    pub fn push(&mut self, message: Message) {
        self.last_activity_at = Utc::now();
        self.messages.push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_message() {
        let msg = Message::new(Role::User, "O que é o DAVE?", None);
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "O que é o DAVE?");
        assert!(msg.id.starts_with("msg_"));
        assert!(msg.knowledge_base_id.is_none());
    }

    #[test]
    fn conversation_tracks_activity() {
        let mut conv = Conversation::new(SessionId::from("session_test"));
        let started = conv.started_at;
        assert!(conv.is_empty());

        conv.push(Message::new(Role::User, "First message", None));
        assert_eq!(conv.messages.len(), 1);
        assert!(conv.last_activity_at >= started);
        assert!(conv.id.starts_with("conv_"));
    }

    #[test]
    fn role_serializes_lowercase() {
        let msg = Message::new(Role::Assistant, "Olá", Some("1".into()));
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""role":"assistant""#));
        assert!(json.contains(r#""knowledge_base_id":"1""#));
    }

    #[test]
    fn session_id_serializes_as_plain_string() {
        let conv = Conversation::new(SessionId::from("session_abc"));
        let json = serde_json::to_string(&conv).unwrap();
        assert!(json.contains(r#""session_id":"session_abc""#));
    }
}
