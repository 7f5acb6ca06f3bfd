use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::info;

use crate::error::CartError;
use crate::store::CartStore;

static INSTANCE: OnceCell<Arc<CartStore>> = OnceCell::new();

/// Process-wide home for a single [`CartStore`].
///
/// Prefer passing the `Arc<CartStore>` explicitly; this exists for consumers
/// that cannot be handed a reference.
pub struct CartProvider;

impl CartProvider {
    pub fn initialize(store: Arc<CartStore>) -> Result<(), CartError> {
        let key = store.key().to_string();
        INSTANCE
            .set(store)
            .map_err(|_| CartError::AlreadyInitialized)?;
        info!(key = %key, "Cart provider initialized");
        Ok(())
    }

    pub fn instance() -> Result<Arc<CartStore>, CartError> {
        INSTANCE.get().cloned().ok_or(CartError::NotInitialized)
    }

    pub fn is_initialized() -> bool {
        INSTANCE.get().is_some()
    }
}

/// Shared cart store.
///
/// # Panics
///
/// Panics if [`CartProvider::initialize`] has not been called.
#[allow(clippy::panic)]
pub fn use_cart() -> Arc<CartStore> {
    match CartProvider::instance() {
        Ok(store) => store,
        Err(e) => panic!("{e}"),
    }
}
