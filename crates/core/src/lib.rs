//! # DAVE Core
//!
//! Domain types, traits, and error definitions for the DAVE FAQ assistant.
//! This crate has **zero framework dependencies**; it defines the domain model
//! that all other crates implement against.
//!
//! Storage is defined as a trait here; implementations live in `dave-storage`.
//! The knowledge lookup and the conversation store only ever see
//! `dyn KeyValueStore`, so tests run against the in-memory backend.

pub mod error;
pub mod message;
pub mod feedback;
pub mod knowledge;
pub mod storage;

// Re-export key types at crate root for ergonomics
pub use error::{ConversationError, Error, KnowledgeError, Result, StorageError};
pub use message::{Conversation, Message, Role, SessionId};
pub use feedback::{Feedback, LearningPattern};
pub use knowledge::{KnowledgeEntry, KnowledgeResponse, RelatedLink};
pub use storage::KeyValueStore;
