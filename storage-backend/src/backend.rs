use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use object_store::local::LocalFileSystem;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::config::StorageConfig;
use crate::error::StorageError;
use crate::KeyValueStorage;

/// Key-value storage on top of an [`ObjectStore`], one object per key.
pub struct ObjectStoreBackend {
    store: Arc<dyn ObjectStore>,
}

impl ObjectStoreBackend {
    pub fn from_config(config: StorageConfig) -> Result<Self> {
        let store: Arc<dyn ObjectStore> = match config {
            StorageConfig::Local { path } => {
                info!("Initializing local storage at: {:?}", path);
                std::fs::create_dir_all(&path).map_err(StorageError::from)?;
                Arc::new(LocalFileSystem::new_with_prefix(path)?)
            }
            StorageConfig::Memory => {
                return Err(anyhow!(
                    "ObjectStoreBackend needs a persistent location; use InMemoryStorage instead"
                ))
            }
        };

        Ok(Self { store })
    }

    /// Wrap an existing object store
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    fn object_path(&self, key: &str) -> Path {
        Path::from(format!("{key}.json"))
    }
}

#[async_trait]
impl KeyValueStorage for ObjectStoreBackend {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.object_path(key);

        match self.store.get(&path).await {
            Ok(result) => {
                let bytes = result
                    .bytes()
                    .await
                    .with_context(|| format!("Failed to read {key}"))?;
                let value = String::from_utf8(bytes.to_vec())
                    .map_err(|_| StorageError::InvalidEncoding(key.to_string()))?;
                debug!(bytes = value.len(), "Read value");
                Ok(Some(value))
            }
            Err(object_store::Error::NotFound { .. }) => {
                debug!("No value stored");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.object_path(key);
        let payload = PutPayload::from(value.as_bytes().to_vec());

        self.store
            .put(&path, payload)
            .await
            .with_context(|| format!("Failed to write {key}"))?;
        debug!("Wrote value");
        Ok(())
    }
}
