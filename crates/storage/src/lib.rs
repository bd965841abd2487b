//! Key-value storage implementations for DAVE.

pub mod noop;
pub mod in_memory;
pub mod file_backend;

pub use noop::NoopStore;
pub use in_memory::InMemoryStore;
pub use file_backend::FileStore;

use std::path::PathBuf;
use std::sync::Arc;

use dave_core::storage::KeyValueStore;

/// Build a store from a backend name ("memory", "file", "none").
///
/// `dir` is only used by the file backend. Returns `None` for unknown names.
pub fn build_store(backend: &str, dir: PathBuf) -> Option<Arc<dyn KeyValueStore>> {
    match backend {
        "memory" => Some(Arc::new(InMemoryStore::new())),
        "file" => Some(Arc::new(FileStore::new(dir))),
        "none" => Some(Arc::new(NoopStore)),
        _ => None,
    }
}
