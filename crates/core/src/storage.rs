//! Key-value storage trait, the local persistence seam.
//!
//! Values are opaque strings (serialized JSON lists). Callers read, modify
//! and write back the whole value on every operation; implementations only
//! need to make single `get`/`set` calls atomic.

use async_trait::async_trait;
use crate::error::StorageError;

/// Key holding the serialized list of conversations.
pub const KEY_CONVERSATIONS: &str = "dave_conversations";

/// Key holding the serialized list of feedback records.
pub const KEY_FEEDBACK: &str = "dave_feedback";

/// Key holding the serialized list of learning patterns.
pub const KEY_PATTERNS: &str = "dave_patterns";

/// Key holding the session id in the session-scoped store.
pub const KEY_SESSION_ID: &str = "dave_session_id";

/// The core KeyValueStore trait.
///
/// Implementations: in-memory (tests, ephemeral sessions), file directory, none (no-op).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// The backend name (e.g., "memory", "file", "none").
    fn name(&self) -> &str;

    /// Read a value. Absent keys yield `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write (create or replace) a value.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Remove a value. Returns whether it existed.
    async fn remove(&self, key: &str) -> Result<bool, StorageError>;

    /// List the stored keys.
    async fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// Check that a key is safe to use as a file name.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let ok = !key.is_empty()
        && key != "."
        && key != ".."
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if ok {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
