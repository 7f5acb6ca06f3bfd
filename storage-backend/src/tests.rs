#[cfg(test)]
mod tests {
    use crate::backend::ObjectStoreBackend;
    use crate::config::StorageConfig;
    use crate::error::StorageError;
    use crate::{InMemoryStorage, KeyValueStorage};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn setup_test_backend() -> (ObjectStoreBackend, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::local(temp_dir.path());
        let backend = ObjectStoreBackend::from_config(config).unwrap();
        (backend, temp_dir)
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let (backend, _temp) = setup_test_backend();

        backend
            .set("@GoMarketPlace:products", r#"[{"id":"1"}]"#)
            .await
            .unwrap();

        let value = backend.get("@GoMarketPlace:products").await.unwrap();
        assert_eq!(value.as_deref(), Some(r#"[{"id":"1"}]"#));
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let (backend, _temp) = setup_test_backend();

        let value = backend.get("@GoMarketPlace:products").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let (backend, _temp) = setup_test_backend();

        backend.set("cart", "first").await.unwrap();
        backend.set("cart", "second").await.unwrap();

        assert_eq!(backend.get("cart").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let (backend, _temp) = setup_test_backend();

        backend.set("@ShopA:products", "a").await.unwrap();
        backend.set("@ShopB:products", "b").await.unwrap();

        assert_eq!(backend.get("@ShopA:products").await.unwrap().as_deref(), Some("a"));
        assert_eq!(backend.get("@ShopB:products").await.unwrap().as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();

        {
            let backend =
                ObjectStoreBackend::from_config(StorageConfig::local(temp_dir.path())).unwrap();
            backend.set("cart", "persisted").await.unwrap();
        }

        let backend =
            ObjectStoreBackend::from_config(StorageConfig::local(temp_dir.path())).unwrap();
        assert_eq!(backend.get("cart").await.unwrap().as_deref(), Some("persisted"));
    }

    #[tokio::test]
    async fn test_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("device").join("storage");

        let backend = ObjectStoreBackend::from_config(StorageConfig::local(&nested)).unwrap();
        backend.set("cart", "[]").await.unwrap();

        assert!(nested.exists());
    }

    #[tokio::test]
    async fn test_wraps_existing_object_store() {
        let store = Arc::new(object_store::memory::InMemory::new());
        let backend = ObjectStoreBackend::new(store);

        assert!(backend.get("@GoMarketPlace:products").await.unwrap().is_none());
        backend.set("@GoMarketPlace:products", "[]").await.unwrap();
        assert_eq!(
            backend.get("@GoMarketPlace:products").await.unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_memory_config_rejected_by_object_store() {
        assert!(ObjectStoreBackend::from_config(StorageConfig::memory()).is_err());
    }

    #[tokio::test]
    async fn test_in_memory_storage() {
        let storage = InMemoryStorage::new();
        assert!(storage.is_empty().await);
        assert!(storage.get("cart").await.unwrap().is_none());

        storage.set("cart", "[]").await.unwrap();
        storage.set("cart", "[1]").await.unwrap();

        assert_eq!(storage.len().await, 1);
        assert_eq!(storage.get("cart").await.unwrap().as_deref(), Some("[1]"));
    }

    #[tokio::test]
    async fn test_shared_handle_delegates() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(InMemoryStorage::with_entry("k", "v"));
        let shared = Arc::clone(&storage);

        shared.set("k", "w").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("w"));
    }

    #[test]
    fn test_config_parse() {
        assert_eq!(
            StorageConfig::parse("local", None).unwrap(),
            StorageConfig::local("./data")
        );
        assert_eq!(
            StorageConfig::parse("local", Some("/tmp/cart".to_string())).unwrap(),
            StorageConfig::local("/tmp/cart")
        );
        assert_eq!(
            StorageConfig::parse("memory", None).unwrap(),
            StorageConfig::Memory
        );

        let err = StorageConfig::parse("s3", None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StorageError>(),
            Some(StorageError::UnknownBackend(name)) if name == "s3"
        ));
    }

    #[tokio::test]
    async fn test_build_local_backend() {
        let temp_dir = TempDir::new().unwrap();
        let storage = StorageConfig::local(temp_dir.path()).build().unwrap();

        storage.set("cart", "[]").await.unwrap();
        assert_eq!(storage.get("cart").await.unwrap().as_deref(), Some("[]"));
    }
}
