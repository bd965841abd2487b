//! Conversation store for DAVE.
//!
//! Persists three bounded lists in a [`KeyValueStore`]: conversations,
//! feedback records and learning patterns. Every operation reads the whole
//! list, modifies it and writes it back under a [`WriteLock`] shared by
//! every service on the same store; there is no cache to invalidate.

pub mod limits;
pub mod session;
pub mod service;

pub use limits::StoreLimits;
pub use session::load_or_create_session;
pub use service::{ConversationService, WriteLock};
