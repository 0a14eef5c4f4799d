//! Product catalog: products, their store, and the validating service.

mod product;
mod service;
mod store;

pub use product::{MAX_PRICE, MAX_STOCK, Product, ProductDraft};
pub use service::CatalogService;
pub use store::{InMemoryProductStore, ProductStore};

use common::ProductId;
use storage::StoreError;
use thiserror::Error;

use crate::error::ErrorKind;

/// Errors that can occur during catalog operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Product name is required.
    #[error("Product name is required")]
    NameRequired,

    /// Price must be positive and at most `MAX_PRICE`.
    #[error(
        "Invalid price: {price_cents} cents (must be between 1 and {max})",
        max = MAX_PRICE.cents()
    )]
    InvalidPrice { price_cents: i64 },

    /// Stock must be between zero and `MAX_STOCK`.
    #[error("Invalid stock: {stock} (must be between 0 and {max})", max = MAX_STOCK)]
    InvalidStock { stock: i64 },

    /// Product not found.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// A product with this id already exists.
    #[error("Product already exists: {0}")]
    AlreadyExists(ProductId),

    /// Not enough stock to apply a reservation.
    #[error(
        "Insufficient stock for '{product_name}': requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        product_name: String,
        available: u32,
        requested: u64,
    },
}

impl CatalogError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::NameRequired
            | CatalogError::InvalidPrice { .. }
            | CatalogError::InvalidStock { .. } => ErrorKind::Validation,
            CatalogError::NotFound(_) => ErrorKind::NotFound,
            CatalogError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            CatalogError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
        }
    }
}

impl From<StoreError> for CatalogError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { key, .. } => CatalogError::NotFound(ProductId::new(key)),
            StoreError::AlreadyExists { key, .. } => {
                CatalogError::AlreadyExists(ProductId::new(key))
            }
        }
    }
}
