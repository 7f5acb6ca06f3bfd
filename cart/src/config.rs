use anyhow::Result;
use shared_types::{StorageKey, DEFAULT_NAMESPACE};
use storage_backend::StorageConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Prefix of the storage key, e.g. `@GoMarketPlace`
    pub namespace: String,
    pub storage: StorageConfig,
}

impl CartConfig {
    pub fn new(namespace: impl Into<String>, storage: StorageConfig) -> Self {
        Self {
            namespace: namespace.into(),
            storage,
        }
    }

    /// Read `CART_NAMESPACE` plus the storage variables understood by
    /// [`StorageConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        let namespace = std::env::var("CART_NAMESPACE")
            .ok()
            .filter(|ns| !ns.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        Ok(Self::new(namespace, StorageConfig::from_env()?))
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn storage_key(&self) -> StorageKey {
        StorageKey::products(self.namespace.clone())
    }
}

impl Default for CartConfig {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE, StorageConfig::memory())
    }
}
