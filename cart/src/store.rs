use anyhow::Result;
use arc_swap::ArcSwap;
use shared_types::{CartItem, CartState, NewCartItem};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use storage_backend::KeyValueStorage;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::CartConfig;
use crate::persist::Persister;

/// Authoritative cart state.
///
/// Reads return the latest in-memory snapshot. Every change publishes a new
/// snapshot and queues it for a full write-back that the caller does not
/// wait on.
pub struct CartStore {
    key: String,
    storage: Arc<dyn KeyValueStorage>,
    products: ArcSwap<Vec<CartItem>>,
    // Serializes read-modify-write of `products`.
    mutation: Mutex<()>,
    // Set when a change was persisted before the load finished.
    written_while_loading: AtomicBool,
    state: watch::Sender<CartState>,
    persister: Persister,
}

impl CartStore {
    /// Create a store and start loading the persisted cart in the background.
    ///
    /// The store starts in [`CartState::Loading`]. Must be called from
    /// within a tokio runtime.
    pub fn open(storage: Arc<dyn KeyValueStorage>, config: &CartConfig) -> Arc<Self> {
        let key = config.storage_key().to_key();
        let (state, _) = watch::channel(CartState::Loading);

        let store = Arc::new(Self {
            persister: Persister::spawn(Arc::clone(&storage), key.clone()),
            key,
            storage,
            products: ArcSwap::from_pointee(Vec::new()),
            mutation: Mutex::new(()),
            written_while_loading: AtomicBool::new(false),
            state,
        });

        let loader = Arc::clone(&store);
        tokio::spawn(async move { loader.load().await });

        store
    }

    /// Open a store and wait until it is ready.
    pub async fn open_ready(storage: Arc<dyn KeyValueStorage>, config: &CartConfig) -> Arc<Self> {
        let store = Self::open(storage, config);
        store.ready().await;
        store
    }

    /// Build the configured storage backend and open a ready store on it.
    pub async fn from_config(config: &CartConfig) -> Result<Arc<Self>> {
        let storage = config.storage.clone().build()?;
        Ok(Self::open_ready(storage, config).await)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn state(&self) -> CartState {
        *self.state.borrow()
    }

    /// Resolves once the persisted cart has been loaded (or given up on).
    pub async fn ready(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|state| *state == CartState::Ready).await;
    }

    /// Current snapshot of the cart, in insertion order.
    pub fn products(&self) -> Arc<Vec<CartItem>> {
        self.products.load_full()
    }

    /// Total number of units across all lines
    pub fn item_count(&self) -> u64 {
        self.products
            .load()
            .iter()
            .map(|item| u64::from(item.quantity))
            .sum()
    }

    pub fn total(&self) -> f64 {
        self.products.load().iter().map(CartItem::subtotal).sum()
    }

    /// Put one unit of `item` in the cart.
    ///
    /// An item already in the cart is incremented rather than duplicated;
    /// otherwise it is appended with quantity 1.
    pub fn add_to_cart(&self, item: NewCartItem) -> bool {
        let id = item.id.clone();
        self.mutate("add_to_cart", &id, move |items| {
            incremented(items, &item.id).or_else(|| Some(appended(items, item)))
        })
    }

    /// Add one unit to the item with `id`. Unknown ids are ignored.
    pub fn increment(&self, id: &str) -> bool {
        self.mutate("increment", id, |items| incremented(items, id))
    }

    /// Remove one unit from the item with `id`, dropping the line when its
    /// last unit goes. Unknown ids are ignored.
    pub fn decrement(&self, id: &str) -> bool {
        self.mutate("decrement", id, |items| decremented(items, id))
    }

    /// Wait until every change made so far has been written to storage.
    pub async fn flush(&self) {
        self.persister.flush().await;
    }

    async fn load(&self) {
        match self.storage.get(&self.key).await {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<CartItem>>(&blob) {
                Ok(items) => {
                    let items = Arc::new(normalized(items));
                    let _guard = self.lock_mutation();
                    self.products.store(Arc::clone(&items));
                    // Storage holds the early change; write the loaded cart over it.
                    if self.written_while_loading.swap(false, Ordering::AcqRel) {
                        debug!(key = %self.key, "Re-persisting loaded cart");
                        self.persister.persist(items);
                    }
                }
                Err(e) => warn!(key = %self.key, error = %e, "Ignoring malformed cart"),
            },
            Ok(None) => debug!(key = %self.key, "No persisted cart"),
            Err(e) => warn!(key = %self.key, error = %e, "Failed to read persisted cart"),
        }

        self.state.send_replace(CartState::Ready);
        info!(
            key = %self.key,
            items = self.products.load().len(),
            "Cart ready"
        );
    }

    fn mutate<F>(&self, op: &'static str, id: &str, change: F) -> bool
    where
        F: FnOnce(&[CartItem]) -> Option<Vec<CartItem>>,
    {
        if self.state() == CartState::Loading {
            warn!(op, id, "Cart changed before load finished");
        }

        let _guard = self.lock_mutation();
        let current = self.products.load_full();

        let Some(next) = change(&current) else {
            debug!(op, id, "No matching item");
            return false;
        };

        let next = Arc::new(next);
        self.products.store(Arc::clone(&next));
        if self.state() == CartState::Loading {
            self.written_while_loading.store(true, Ordering::Release);
        }
        debug!(op, id, items = next.len(), "Cart updated");
        self.persister.persist(next);
        true
    }

    fn lock_mutation(&self) -> MutexGuard<'_, ()> {
        self.mutation.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn position(items: &[CartItem], id: &str) -> Option<usize> {
    items.iter().position(|item| item.id == id)
}

pub(crate) fn appended(items: &[CartItem], item: NewCartItem) -> Vec<CartItem> {
    let mut next = items.to_vec();
    next.push(item.with_quantity(1));
    next
}

pub(crate) fn incremented(items: &[CartItem], id: &str) -> Option<Vec<CartItem>> {
    let index = position(items, id)?;
    let mut next = items.to_vec();
    next[index].quantity = next[index].quantity.saturating_add(1);
    Some(next)
}

pub(crate) fn decremented(items: &[CartItem], id: &str) -> Option<Vec<CartItem>> {
    let index = position(items, id)?;
    let quantity = items[index].quantity;
    let mut next = items.to_vec();

    if quantity <= 1 {
        next.remove(index);
    } else {
        next[index].quantity = quantity - 1;
    }
    Some(next)
}

/// Drop zero-quantity lines and repeated ids from a loaded cart.
pub(crate) fn normalized(items: Vec<CartItem>) -> Vec<CartItem> {
    let total = items.len();
    let mut seen = HashSet::new();
    let items: Vec<CartItem> = items
        .into_iter()
        .filter(|item| item.quantity > 0 && seen.insert(item.id.clone()))
        .collect();

    if items.len() != total {
        warn!(
            dropped = total - items.len(),
            "Dropped invalid lines from persisted cart"
        );
    }
    items
}
