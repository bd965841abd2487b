pub mod ask;
pub mod chat;
pub mod feedback;
pub mod history;
pub mod onboard;
pub mod patterns;
pub mod serve;
pub mod status;

use std::sync::Arc;

use dave_assistant::{Assistant, PonderDelay};
use dave_config::AppConfig;
use dave_conversation::{ConversationService, WriteLock, load_or_create_session};
use dave_core::message::SessionId;
use dave_core::storage::KeyValueStore;
use dave_knowledge::KnowledgeBase;
use dave_storage::InMemoryStore;
use tracing::debug;

/// Everything a command needs: config, the long-lived store, the knowledge
/// table and the session this process speaks for.
pub struct Context {
    pub config: AppConfig,
    pub store: Arc<dyn KeyValueStore>,
    pub knowledge: Arc<KnowledgeBase>,
    pub session_id: SessionId,
    write_lock: WriteLock,
}

impl Context {
    /// Load config and open the store.
    ///
    /// Without `--session` every process is its own session, like a fresh
    /// browser tab.
    pub async fn load(session: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
        let store = dave_gateway::open_store(&config)?;
        let knowledge = Arc::new(dave_gateway::load_knowledge(&config)?);

        let session_id = match session.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => SessionId::from(id),
            _ => load_or_create_session(&InMemoryStore::new()).await?,
        };

        debug!(
            session = %session_id,
            store = store.name(),
            entries = knowledge.entries().len(),
            "Context loaded"
        );

        Ok(Self {
            config,
            store,
            knowledge,
            session_id,
            write_lock: WriteLock::default(),
        })
    }

    pub fn service(&self) -> ConversationService {
        ConversationService::new(
            self.store.clone(),
            self.session_id.clone(),
            self.config.limits.to_store_limits(),
        )
        .with_write_lock(self.write_lock.clone())
    }

    pub async fn assistant(&self) -> Result<Assistant, Box<dyn std::error::Error>> {
        let ponder = PonderDelay::new(
            self.config.assistant.ponder_base(),
            self.config.assistant.ponder_jitter(),
        );
        Ok(Assistant::open(self.service(), self.knowledge.clone())
            .await?
            .with_ponder(ponder)
            .with_suggestion_count(self.config.assistant.suggestion_count))
    }
}

/// Cut `text` to at most `max` chars, marking the cut.
pub fn preview(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() <= max && line.len() == text.len() {
        return line.to_string();
    }
    let cut: String = line.chars().take(max).collect();
    format!("{cut}…")
}
