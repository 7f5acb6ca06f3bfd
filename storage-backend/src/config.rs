use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::StorageError;
use crate::{InMemoryStorage, KeyValueStorage, ObjectStoreBackend};

/// Default directory for the local backend
pub const DEFAULT_STORAGE_PATH: &str = "./data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Local { path: PathBuf },
    Memory,
}

impl StorageConfig {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::Local { path: path.into() }
    }

    pub fn memory() -> Self {
        Self::Memory
    }

    /// Read `STORAGE_BACKEND` (`local` or `memory`) and `STORAGE_PATH`.
    pub fn from_env() -> Result<Self> {
        let backend = std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "local".to_string());
        Self::parse(&backend, std::env::var("STORAGE_PATH").ok())
    }

    pub(crate) fn parse(backend: &str, path: Option<String>) -> Result<Self> {
        match backend {
            "local" => Ok(Self::local(
                path.unwrap_or_else(|| DEFAULT_STORAGE_PATH.to_string()),
            )),
            "memory" => Ok(Self::memory()),
            other => Err(StorageError::UnknownBackend(other.to_string()).into()),
        }
    }

    /// Build the backend this config describes.
    pub fn build(self) -> Result<Arc<dyn KeyValueStorage>> {
        let storage: Arc<dyn KeyValueStorage> = match &self {
            Self::Local { path } => {
                let context = format!("Failed to open local storage at {}", path.display());
                Arc::new(ObjectStoreBackend::from_config(self.clone()).context(context)?)
            }
            Self::Memory => Arc::new(InMemoryStorage::new()),
        };
        Ok(storage)
    }
}
