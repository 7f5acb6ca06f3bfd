use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("use_cart must be used within a CartProvider. Call CartProvider::initialize() first.")]
    NotInitialized,

    #[error("CartProvider already initialized")]
    AlreadyInitialized,
}
