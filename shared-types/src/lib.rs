use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "@GoMarketPlace";

/// Suffix identifying the cart list within a namespace
pub const PRODUCTS_SUFFIX: &str = "products";

/// Structured key for the persisted cart list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct StorageKey {
    pub namespace: String,
    pub name: String,
}

impl StorageKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Key holding the cart list for `namespace`
    pub fn products(namespace: impl Into<String>) -> Self {
        Self::new(namespace, PRODUCTS_SUFFIX)
    }

    /// Flat string form used by key-value stores, e.g. `@GoMarketPlace:products`
    pub fn to_key(&self) -> String {
        format!("{}:{}", self.namespace, self.name)
    }
}

impl Default for StorageKey {
    fn default() -> Self {
        Self::products(DEFAULT_NAMESPACE)
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_key())
    }
}

/// A product about to be put in the cart. Quantity is assigned by the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCartItem {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
}

impl NewCartItem {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }

    pub fn with_quantity(self, quantity: u32) -> CartItem {
        CartItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity,
        }
    }
}

/// One line of the cart. `quantity` is at least 1 while the item is present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
    pub quantity: u32,
}

impl CartItem {
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Lifecycle of a cart store
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CartState {
    /// Persisted data has not been read yet
    Loading,
    /// Persisted data loaded, or defaulted to an empty cart
    Ready,
}

impl fmt::Display for CartState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => write!(f, "loading"),
            Self::Ready => write!(f, "ready"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_format() {
        assert_eq!(StorageKey::default().to_key(), "@GoMarketPlace:products");
        assert_eq!(StorageKey::products("@Shop").to_string(), "@Shop:products");
    }

    #[test]
    fn test_item_json_field_names() {
        let item = NewCartItem::new("A", "T", "u", 10.0).with_quantity(2);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "A",
                "title": "T",
                "image_url": "u",
                "price": 10.0,
                "quantity": 2
            })
        );
    }

    #[test]
    fn test_cart_list_roundtrip_preserves_order() {
        let items = vec![
            NewCartItem::new("b", "Shoes", "https://img/b.png", 149.9).with_quantity(1),
            NewCartItem::new("a", "Shirt", "https://img/a.png", 39.5).with_quantity(3),
        ];
        let blob = serde_json::to_string(&items).unwrap();
        let restored: Vec<CartItem> = serde_json::from_str(&blob).unwrap();
        assert_eq!(restored, items);
    }

    #[test]
    fn test_subtotal() {
        let item = NewCartItem::new("a", "Shirt", "u", 2.5).with_quantity(4);
        assert!((item.subtotal() - 10.0).abs() < f64::EPSILON);
    }
}
