//! The conversation service, one session's view of the persisted lists.

use std::sync::Arc;

use dave_core::error::{ConversationError, Result, StorageError};
use dave_core::feedback::{Feedback, LearningPattern};
use dave_core::message::{Conversation, Message, Role, SessionId};
use dave_core::storage::{KEY_CONVERSATIONS, KEY_FEEDBACK, KEY_PATTERNS, KeyValueStore};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::limits::StoreLimits;

/// Minimum length (in chars) of a normalized question worth remembering.
const MIN_PATTERN_CHARS: usize = 3;

/// Held across every read-modify-write of the lists in one store.
///
/// Services of different sessions over the same store must share one lock,
/// otherwise a whole-list rewrite can drop another session's write.
pub type WriteLock = Arc<Mutex<()>>;

/// Conversation store bound to one session.
#[derive(Clone)]
pub struct ConversationService {
    store: Arc<dyn KeyValueStore>,
    session_id: SessionId,
    limits: StoreLimits,
    write_lock: WriteLock,
}

impl ConversationService {
    pub fn new(store: Arc<dyn KeyValueStore>, session_id: SessionId, limits: StoreLimits) -> Self {
        Self {
            store,
            session_id,
            limits,
            write_lock: WriteLock::default(),
        }
    }

    /// Share `lock` with the other services writing to the same store.
    pub fn with_write_lock(mut self, lock: WriteLock) -> Self {
        self.write_lock = lock;
        self
    }

    pub fn write_lock(&self) -> &WriteLock {
        &self.write_lock
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn limits(&self) -> StoreLimits {
        self.limits
    }

    // --- Conversations ---

    /// Start and persist an empty conversation for this session.
    pub async fn create_conversation(&self) -> Result<Conversation> {
        let _guard = self.write_lock.lock().await;
        self.create_conversation_locked().await
    }

    async fn create_conversation_locked(&self) -> Result<Conversation> {
        let conversation = Conversation::new(self.session_id.clone());
        let mut conversations = self.all_conversations().await?;
        conversations.push(conversation.clone());
        self.save_conversations(conversations).await?;
        debug!(conversation = %conversation.id, session = %self.session_id, "Conversation created");
        Ok(conversation)
    }

    pub async fn get_conversation(&self, conversation_id: &str) -> Result<Option<Conversation>> {
        Ok(self
            .all_conversations()
            .await?
            .into_iter()
            .find(|c| c.id == conversation_id))
    }

    /// The most recently active conversation of this session, or a new one.
    pub async fn current_conversation(&self) -> Result<Conversation> {
        let _guard = self.write_lock.lock().await;
        let latest = self
            .all_conversations()
            .await?
            .into_iter()
            .filter(|c| c.session_id == self.session_id)
            .max_by_key(|c| c.last_activity_at);

        match latest {
            Some(conversation) => Ok(conversation),
            None => self.create_conversation_locked().await,
        }
    }

    /// Append a message. Fails if the conversation is unknown.
    ///
    /// User messages are also counted as learning patterns.
    pub async fn add_message(
        &self,
        conversation_id: &str,
        role: Role,
        content: &str,
        knowledge_base_id: Option<String>,
    ) -> Result<Message> {
        let _guard = self.write_lock.lock().await;
        let mut conversations = self.all_conversations().await?;
        let conversation = conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
            .ok_or_else(|| ConversationError::NotFound(conversation_id.to_string()))?;

        let message = Message::new(role, content, knowledge_base_id);
        conversation.push(message.clone());
        self.save_conversations(conversations).await?;

        debug!(
            conversation = %conversation_id,
            message = %message.id,
            role = %role,
            "Message appended"
        );

        if role == Role::User {
            self.record_pattern_locked(content).await?;
        }

        Ok(message)
    }

    /// Every stored conversation, all sessions included.
    pub async fn all_conversations(&self) -> Result<Vec<Conversation>> {
        self.read_list(KEY_CONVERSATIONS).await
    }

    /// Drop this session's conversations; other sessions are untouched.
    ///
    /// Returns how many were removed.
    pub async fn clear_history(&self) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let conversations = self.all_conversations().await?;
        let before = conversations.len();
        let kept: Vec<Conversation> = conversations
            .into_iter()
            .filter(|c| c.session_id != self.session_id)
            .collect();
        let removed = before - kept.len();
        self.write_list(KEY_CONVERSATIONS, &kept).await?;
        info!(session = %self.session_id, removed, "Conversation history cleared");
        Ok(removed)
    }

    async fn save_conversations(&self, mut conversations: Vec<Conversation>) -> Result<()> {
        let max = self.limits.max_conversations;
        if conversations.len() > max {
            conversations.sort_by(|a, b| b.last_activity_at.cmp(&a.last_activity_at));
            let evicted = conversations.len() - max;
            conversations.truncate(max);
            info!(evicted, kept = max, "Evicted least recently active conversations");
        }
        self.write_list(KEY_CONVERSATIONS, &conversations).await
    }

    // --- Feedback ---

    /// Append a feedback record. Repeats are stored as-is.
    pub async fn submit_feedback(
        &self,
        message_id: &str,
        was_helpful: bool,
        comment: Option<String>,
    ) -> Result<Feedback> {
        let feedback = Feedback::new(message_id, was_helpful, comment);
        let _guard = self.write_lock.lock().await;
        let mut all = self.all_feedback().await?;
        all.push(feedback.clone());

        let max = self.limits.max_feedback;
        if all.len() > max {
            all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            let evicted = all.len() - max;
            all.truncate(max);
            info!(evicted, kept = max, "Evicted oldest feedback records");
        }

        self.write_list(KEY_FEEDBACK, &all).await?;
        debug!(message = %message_id, was_helpful, "Feedback recorded");
        Ok(feedback)
    }

    pub async fn all_feedback(&self) -> Result<Vec<Feedback>> {
        self.read_list(KEY_FEEDBACK).await
    }

    // --- Learning patterns ---

    /// Count one occurrence of a question.
    ///
    /// The text is lowercased and trimmed; anything shorter than three
    /// characters is ignored and yields `None`.
    pub async fn record_pattern(&self, question: &str) -> Result<Option<LearningPattern>> {
        let _guard = self.write_lock.lock().await;
        self.record_pattern_locked(question).await
    }

    async fn record_pattern_locked(&self, question: &str) -> Result<Option<LearningPattern>> {
        let normalized = question.to_lowercase().trim().to_string();
        if normalized.chars().count() < MIN_PATTERN_CHARS {
            return Ok(None);
        }

        let mut patterns = self.all_patterns().await?;
        let recorded = match patterns.iter_mut().find(|p| p.pattern == normalized) {
            Some(existing) => {
                existing.bump();
                existing.clone()
            }
            None => {
                let fresh = LearningPattern::new(normalized);
                patterns.push(fresh.clone());
                fresh
            }
        };

        // Stable: equal frequencies keep insertion order.
        patterns.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        let max = self.limits.max_patterns;
        if patterns.len() > max {
            patterns.truncate(max);
            debug!(kept = max, "Evicted least frequent pattern");
        }

        self.write_list(KEY_PATTERNS, &patterns).await?;
        Ok(Some(recorded))
    }

    /// The `limit` most frequent questions.
    pub async fn top_patterns(&self, limit: usize) -> Result<Vec<LearningPattern>> {
        let mut patterns = self.all_patterns().await?;
        patterns.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        patterns.truncate(limit);
        Ok(patterns)
    }

    pub async fn all_patterns(&self) -> Result<Vec<LearningPattern>> {
        self.read_list(KEY_PATTERNS).await
    }

    // --- Storage helpers ---

    /// Absent keys read as an empty list; unparsable ones are an error.
    async fn read_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        let list = serde_json::from_str(&raw).map_err(|e| StorageError::Corrupted {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        Ok(list)
    }

    async fn write_list<T: Serialize>(&self, key: &str, list: &[T]) -> Result<()> {
        let raw = serde_json::to_string(list)?;
        self.store.set(key, raw).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dave_core::error::Error;
    use dave_storage::InMemoryStore;

    fn service() -> ConversationService {
        service_on(Arc::new(InMemoryStore::new()), "session_a")
    }

    fn service_on(store: Arc<dyn KeyValueStore>, session: &str) -> ConversationService {
        ConversationService::new(store, SessionId::from(session), StoreLimits::default())
    }

    #[tokio::test]
    async fn create_and_fetch() {
        let svc = service();
        let conv = svc.create_conversation().await.unwrap();
        assert_eq!(conv.session_id.as_str(), "session_a");

        let fetched = svc.get_conversation(&conv.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, conv.id);
        assert!(svc.get_conversation("conv_missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn current_conversation_creates_then_reuses() {
        let svc = service();
        let first = svc.current_conversation().await.unwrap();
        let again = svc.current_conversation().await.unwrap();
        assert_eq!(first.id, again.id);
        assert_eq!(svc.all_conversations().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn current_conversation_is_most_recently_active() {
        let svc = service();
        let older = svc.create_conversation().await.unwrap();
        let newer = svc.create_conversation().await.unwrap();
        assert_eq!(svc.current_conversation().await.unwrap().id, newer.id);

        svc.add_message(&older.id, Role::User, "voltando à conversa antiga", None)
            .await
            .unwrap();
        assert_eq!(svc.current_conversation().await.unwrap().id, older.id);
    }

    #[tokio::test]
    async fn current_conversation_ignores_other_sessions() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        let other = service_on(store.clone(), "session_other");
        let theirs = other.create_conversation().await.unwrap();

        let mine = service_on(store, "session_mine").current_conversation().await.unwrap();
        assert_ne!(mine.id, theirs.id);
        assert_eq!(mine.session_id.as_str(), "session_mine");
    }

    #[tokio::test]
    async fn messages_keep_insertion_order() {
        let svc = service();
        let conv = svc.create_conversation().await.unwrap();

        let user = svc
            .add_message(&conv.id, Role::User, "Como usar o Estimador de Migração?", None)
            .await
            .unwrap();
        let reply = svc
            .add_message(&conv.id, Role::Assistant, "Assim.", Some("3".into()))
            .await
            .unwrap();

        let stored = svc.get_conversation(&conv.id).await.unwrap().unwrap();
        let ids: Vec<&str> = stored.messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec![user.id.as_str(), reply.id.as_str()]);
        assert_eq!(stored.messages[0].role, Role::User);
        assert_eq!(stored.messages[1].role, Role::Assistant);
        assert_eq!(stored.messages[1].knowledge_base_id.as_deref(), Some("3"));
        assert!(stored.last_activity_at >= stored.started_at);
    }

    #[tokio::test]
    async fn add_message_to_unknown_conversation_fails() {
        let svc = service();
        let err = svc
            .add_message("conv_nope", Role::User, "hello there", None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Conversation(ConversationError::NotFound(ref id)) if id == "conv_nope"
        ));
        // Nothing was recorded as a side effect.
        assert!(svc.all_patterns().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn conversations_capped_at_fifty() {
        let svc = service();
        let mut last = None;
        for _ in 0..60 {
            last = Some(svc.create_conversation().await.unwrap());
        }
        let all = svc.all_conversations().await.unwrap();
        assert_eq!(all.len(), 50);
        // The newest one survives eviction.
        let newest = last.unwrap();
        assert!(all.iter().any(|c| c.id == newest.id));
    }

    #[tokio::test]
    async fn feedback_appends_and_caps_at_five_hundred() {
        let svc = service();
        svc.submit_feedback("msg_1", true, None).await.unwrap();
        svc.submit_feedback("msg_1", true, None).await.unwrap();
        let all = svc.all_feedback().await.unwrap();
        assert_eq!(all.len(), 2, "store itself does not deduplicate");

        for i in 0..520 {
            svc.submit_feedback(&format!("msg_{i}"), i % 2 == 0, None)
                .await
                .unwrap();
        }
        assert_eq!(svc.all_feedback().await.unwrap().len(), 500);
    }

    #[tokio::test]
    async fn feedback_keeps_comment() {
        let svc = service();
        svc.submit_feedback("msg_x", false, Some("faltou detalhe".into()))
            .await
            .unwrap();
        let all = svc.all_feedback().await.unwrap();
        assert_eq!(all[0].comment.as_deref(), Some("faltou detalhe"));
        assert!(!all[0].was_helpful);
    }

    #[tokio::test]
    async fn patterns_are_normalized_and_counted() {
        let svc = service();
        svc.record_pattern("  O que é o DAVE?  ").await.unwrap();
        let again = svc.record_pattern("o que é o dave?").await.unwrap().unwrap();
        assert_eq!(again.frequency, 2);
        assert_eq!(again.pattern, "o que é o dave?");

        let all = svc.all_patterns().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn short_patterns_ignored() {
        let svc = service();
        assert!(svc.record_pattern(" oi ").await.unwrap().is_none());
        assert!(svc.all_patterns().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn user_messages_feed_patterns_but_assistant_messages_do_not() {
        let svc = service();
        let conv = svc.create_conversation().await.unwrap();
        svc.add_message(&conv.id, Role::User, "Quanto tempo leva?", None)
            .await
            .unwrap();
        svc.add_message(&conv.id, Role::Assistant, "Depende.", None)
            .await
            .unwrap();

        let patterns = svc.all_patterns().await.unwrap();
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].pattern, "quanto tempo leva?");
    }

    #[tokio::test]
    async fn patterns_capped_at_two_hundred() {
        let svc = service();
        svc.record_pattern("pergunta frequente").await.unwrap();
        svc.record_pattern("pergunta frequente").await.unwrap();
        for i in 0..250 {
            svc.record_pattern(&format!("pergunta {i}")).await.unwrap();
        }
        let all = svc.all_patterns().await.unwrap();
        assert_eq!(all.len(), 200);
        // The most frequent one is never evicted.
        assert_eq!(all[0].pattern, "pergunta frequente");
        assert_eq!(all[0].frequency, 2);
    }

    #[tokio::test]
    async fn top_patterns_sorted_by_frequency() {
        let svc = service();
        for _ in 0..3 {
            svc.record_pattern("como usar o estimador").await.unwrap();
        }
        svc.record_pattern("o que é o dave").await.unwrap();
        for _ in 0..2 {
            svc.record_pattern("quais ferramentas").await.unwrap();
        }

        let top = svc.top_patterns(2).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].pattern, "como usar o estimador");
        assert_eq!(top[1].pattern, "quais ferramentas");
    }

    #[tokio::test]
    async fn clear_history_only_touches_own_session() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        let mine = service_on(store.clone(), "session_mine");
        let other = service_on(store, "session_other");

        mine.create_conversation().await.unwrap();
        mine.create_conversation().await.unwrap();
        let kept = other.create_conversation().await.unwrap();

        assert_eq!(mine.clear_history().await.unwrap(), 2);
        let all = mine.all_conversations().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, kept.id);
    }

    #[tokio::test]
    async fn corrupted_list_is_reported() {
        let store = Arc::new(InMemoryStore::new());
        store.set(KEY_FEEDBACK, "{not json".into()).await.unwrap();
        let svc = service_on(store.clone(), "session_a");

        let err = svc.all_feedback().await.unwrap_err();
        assert!(matches!(err, Error::Storage(StorageError::Corrupted { .. })));

        // A failed write path must not clobber the stored value.
        assert!(svc.submit_feedback("msg_1", true, None).await.is_err());
        assert_eq!(store.get(KEY_FEEDBACK).await.unwrap().as_deref(), Some("{not json"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn parallel_sessions_on_one_store_lose_nothing() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        let lock = WriteLock::default();

        let mut tasks = Vec::new();
        for i in 0..16 {
            let svc = service_on(store.clone(), &format!("session_{i}"))
                .with_write_lock(lock.clone());
            tasks.push(tokio::spawn(async move {
                let conv = svc.create_conversation().await?;
                for n in 0..10 {
                    svc.add_message(&conv.id, Role::User, &format!("pergunta {n}"), None)
                        .await?;
                }
                svc.submit_feedback(&conv.id, true, None).await?;
                Ok::<_, Error>(())
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let reader = service_on(store, "session_reader");
        let all = reader.all_conversations().await.unwrap();
        assert_eq!(all.len(), 16);
        assert_eq!(all.iter().map(|c| c.messages.len()).sum::<usize>(), 160);
        assert_eq!(reader.all_feedback().await.unwrap().len(), 16);

        let patterns = reader.all_patterns().await.unwrap();
        assert_eq!(patterns.len(), 10);
        assert!(patterns.iter().all(|p| p.frequency == 16));
    }

    #[tokio::test]
    async fn lists_survive_a_fresh_service() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        let conv = service_on(store.clone(), "session_a")
            .create_conversation()
            .await
            .unwrap();

        let reopened = service_on(store, "session_a");
        assert_eq!(reopened.current_conversation().await.unwrap().id, conv.id);
    }
}
