//! In-memory shopping cart backed by device-local key-value storage.
//!
//! A [`CartStore`] loads the persisted cart once when opened, serves reads
//! from memory, and hands every changed snapshot to a background writer.
//! Share it by passing the `Arc<CartStore>` around, or install it once with
//! [`CartProvider::initialize`] for consumers that cannot be handed a
//! reference.

pub mod config;
pub mod error;
mod persist;
pub mod provider;
pub mod store;


pub use config::CartConfig;
pub use error::CartError;
pub use provider::{use_cart, CartProvider};
pub use shared_types::{CartItem, CartState, NewCartItem, StorageKey};
pub use store::CartStore;
