//! Session identity.
//!
//! A session groups the conversations created without any login. Its id is
//! kept in a session-scoped store, separate from the long-lived one.

use dave_core::error::StorageError;
use dave_core::message::SessionId;
use dave_core::storage::{KEY_SESSION_ID, KeyValueStore};
use tracing::info;

/// Read the session id from `session_store`, creating and saving one if absent.
pub async fn load_or_create_session(
    session_store: &dyn KeyValueStore,
) -> Result<SessionId, StorageError> {
    if let Some(existing) = session_store.get(KEY_SESSION_ID).await? {
        let existing = existing.trim();
        if !existing.is_empty() {
            return Ok(SessionId::from(existing));
        }
    }

    let session_id = SessionId::new();
    session_store
        .set(KEY_SESSION_ID, session_id.as_str().to_string())
        .await?;
    info!(session = %session_id, "New session started");
    Ok(session_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dave_storage::InMemoryStore;

    #[tokio::test]
    async fn creates_once_then_reuses() {
        let store = InMemoryStore::new();
        let first = load_or_create_session(&store).await.unwrap();
        let second = load_or_create_session(&store).await.unwrap();
        assert_eq!(first, second);
        assert!(first.as_str().starts_with("session_"));
    }

    #[tokio::test]
    async fn separate_stores_get_separate_sessions() {
        let a = load_or_create_session(&InMemoryStore::new()).await.unwrap();
        let b = load_or_create_session(&InMemoryStore::new()).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn blank_value_is_replaced() {
        let store = InMemoryStore::new();
        store.set(KEY_SESSION_ID, "  ".into()).await.unwrap();
        let id = load_or_create_session(&store).await.unwrap();
        assert!(!id.as_str().trim().is_empty());
        assert_eq!(store.get(KEY_SESSION_ID).await.unwrap().as_deref(), Some(id.as_str()));
    }
}
