//! No-op store. Nothing is persisted and every read is absent.

use async_trait::async_trait;
use dave_core::error::StorageError;
use dave_core::storage::KeyValueStore;

pub struct NoopStore;

#[async_trait]
impl KeyValueStore for NoopStore {
    fn name(&self) -> &str {
        "none"
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: String) -> Result<(), StorageError> {
        Ok(())
    }

    async fn remove(&self, _key: &str) -> Result<bool, StorageError> {
        Ok(false)
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(Vec::new())
    }
}
