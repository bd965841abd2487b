//! Live chat sessions held by the gateway.
//!
//! Each session owns one [`Assistant`] behind its own mutex, so requests of
//! one session run one at a time while distinct sessions proceed in
//! parallel. The registry is bounded; the least recently used session is
//! dropped when a new one would exceed the capacity. Dropping a session only
//! forgets the in-memory view; its conversations stay in the store.
//!
//! Every session writes through one shared [`WriteLock`], so parallel
//! sessions never overwrite each other's list updates.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use dave_assistant::{Assistant, PonderDelay};
use dave_conversation::{ConversationService, StoreLimits, WriteLock};
use dave_core::error::Result;
use dave_core::message::SessionId;
use dave_core::storage::KeyValueStore;
use dave_knowledge::KnowledgeBase;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

/// Maximum number of live sessions before the least recently used is dropped.
pub const MAX_SESSIONS: usize = 1_000;

/// Longest session id accepted from a client.
const MAX_SESSION_ID_LEN: usize = 128;

/// How new assistants are set up.
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub limits: StoreLimits,
    pub ponder: PonderDelay,
    pub suggestion_count: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            limits: StoreLimits::default(),
            ponder: PonderDelay::default(),
            suggestion_count: 3,
        }
    }
}

pub type SessionHandle = Arc<Mutex<Assistant>>;

struct Slot {
    assistant: SessionHandle,
    last_seen: Instant,
}

pub struct SessionRegistry {
    store: Arc<dyn KeyValueStore>,
    knowledge: Arc<KnowledgeBase>,
    settings: SessionSettings,
    write_lock: WriteLock,
    capacity: usize,
    slots: RwLock<HashMap<String, Slot>>,
}

impl SessionRegistry {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        knowledge: Arc<KnowledgeBase>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            store,
            knowledge,
            settings,
            write_lock: WriteLock::default(),
            capacity: MAX_SESSIONS,
            slots: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub fn knowledge(&self) -> &Arc<KnowledgeBase> {
        &self.knowledge
    }

    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    /// A conversation service for `session_id`, sharing the registry's write lock.
    pub fn service(&self, session_id: SessionId) -> ConversationService {
        ConversationService::new(self.store.clone(), session_id, self.settings.limits)
            .with_write_lock(self.write_lock.clone())
    }

    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }

    /// Find the session named by the client, or open one.
    ///
    /// A well-formed id that is not live yet is opened under that id, which
    /// resumes whatever the store already holds for it. Missing or malformed
    /// ids get a fresh session.
    pub async fn resolve(&self, requested: Option<&str>) -> Result<(SessionId, SessionHandle)> {
        let requested = requested.map(str::trim).filter(|id| is_valid_session_id(id));

        if let Some(id) = requested {
            let mut slots = self.slots.write().await;
            if let Some(slot) = slots.get_mut(id) {
                slot.last_seen = Instant::now();
                return Ok((SessionId::from(id), slot.assistant.clone()));
            }
        }

        let session_id = requested.map(SessionId::from).unwrap_or_default();
        self.open(session_id).await
    }

    /// Always start a brand-new session.
    pub async fn open_new(&self) -> Result<(SessionId, SessionHandle)> {
        self.open(SessionId::new()).await
    }

    async fn open(&self, session_id: SessionId) -> Result<(SessionId, SessionHandle)> {
        let service = self.service(session_id.clone());
        let assistant = Assistant::open(service, self.knowledge.clone())
            .await?
            .with_ponder(self.settings.ponder)
            .with_suggestion_count(self.settings.suggestion_count);

        let mut slots = self.slots.write().await;
        // Another request may have opened the same id meanwhile.
        if let Some(slot) = slots.get_mut(session_id.as_str()) {
            slot.last_seen = Instant::now();
            return Ok((session_id, slot.assistant.clone()));
        }

        if slots.len() >= self.capacity {
            if let Some(oldest) = slots
                .iter()
                .min_by_key(|(_, slot)| slot.last_seen)
                .map(|(id, _)| id.clone())
            {
                slots.remove(&oldest);
                info!(session = %oldest, "Evicted least recently used session");
            }
        }

        let handle = Arc::new(Mutex::new(assistant));
        slots.insert(
            session_id.as_str().to_string(),
            Slot {
                assistant: handle.clone(),
                last_seen: Instant::now(),
            },
        );
        debug!(session = %session_id, live = slots.len(), "Session opened");
        Ok((session_id, handle))
    }
}

/// Session ids from clients must be short and header-safe.
pub fn is_valid_session_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_SESSION_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
