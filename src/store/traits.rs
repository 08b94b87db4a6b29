//! `KeyValueStore` trait: the async string store every record lives in.

use async_trait::async_trait;

use crate::error::StoreError;

/// Backend-agnostic key-value store.
///
/// Implementations must preserve read-after-write ordering for the same key
/// within a single call sequence.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove every listed key. Missing keys are ignored.
    async fn remove_many(&self, keys: &[&str]) -> Result<(), StoreError>;

    /// Remove a single key.
    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.remove_many(&[key]).await
    }
}
