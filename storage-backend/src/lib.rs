pub mod backend;
pub mod config;
pub mod error;
pub mod memory;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use std::sync::Arc;

pub use backend::ObjectStoreBackend;
pub use config::StorageConfig;
pub use error::{Result, StorageError};
pub use memory::InMemoryStorage;

/// Device-local string key-value storage.
///
/// Values are opaque strings; callers own their encoding. A missing key is
/// `Ok(None)`, never an error.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[async_trait]
impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }
}
