//! Order placement and lifecycle.

mod catalog;
mod commands;
mod entity;
mod service;
mod state;
mod store;
mod value_objects;

pub use catalog::ProductCatalog;
pub use commands::{PlaceOrder, UpdateOrderStatus};
pub use entity::Order;
pub use service::OrderService;
pub use state::OrderStatus;
pub use store::{InMemoryOrderStore, OrderStore};
pub use value_objects::{LineRequest, OrderLine};

use common::{OrderId, ProductId};
use storage::StoreError;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::error::ErrorKind;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// User ID is required.
    #[error("User ID is required")]
    UserIdRequired,

    /// Shipping address is required.
    #[error("Shipping address is required")]
    ShippingAddressRequired,

    /// Order has no line items.
    #[error("Order must contain at least one line item")]
    NoLines,

    /// A line item names no product.
    #[error("Product ID is required for every line item")]
    ProductIdRequired,

    /// Invalid quantity.
    #[error("Invalid quantity for {product_id}: {quantity} (must be greater than 0)")]
    InvalidQuantity {
        product_id: ProductId,
        quantity: u32,
    },

    /// The order total does not fit in the money representation.
    #[error("Order total is too large")]
    TotalOverflow,

    /// A line item references an unknown product.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Not enough stock to fill a line item.
    #[error(
        "Insufficient stock for '{product_name}': requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        product_name: String,
        available: u32,
        requested: u32,
    },

    /// The state machine does not allow this status change.
    #[error("Invalid status transition: cannot move from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Order not found.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// An order with this id already exists.
    #[error("Order already exists: {0}")]
    AlreadyExists(OrderId),

    /// The order's status changed between validation and commit.
    #[error("Order {order_id} was modified concurrently: expected {expected}, found {actual}")]
    ConcurrentModification {
        order_id: OrderId,
        expected: OrderStatus,
        actual: OrderStatus,
    },

    /// Returning stock for a cancelled order failed; the order was not cancelled.
    #[error("Could not restore stock of {product_id} for order {order_id}")]
    StockRestoreFailed {
        order_id: OrderId,
        product_id: ProductId,
        #[source]
        source: CatalogError,
    },

    /// The catalog refused a stock change.
    #[error(transparent)]
    Catalog(CatalogError),
}

impl OrderError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrderError::UserIdRequired
            | OrderError::ShippingAddressRequired
            | OrderError::NoLines
            | OrderError::ProductIdRequired
            | OrderError::InvalidQuantity { .. }
            | OrderError::TotalOverflow => ErrorKind::Validation,
            OrderError::ProductNotFound(_) | OrderError::NotFound(_) => ErrorKind::NotFound,
            OrderError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            OrderError::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            OrderError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            OrderError::ConcurrentModification { .. } | OrderError::StockRestoreFailed { .. } => {
                ErrorKind::Conflict
            }
            OrderError::Catalog(e) => e.kind(),
        }
    }

    /// Short label used for the `reason` metric dimension.
    pub(crate) fn reason(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::InsufficientStock => "insufficient_stock",
            ErrorKind::InvalidTransition => "invalid_transition",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::AuthenticationFailure => "authentication",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Internal => "internal",
        }
    }
}

impl From<CatalogError> for OrderError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::NotFound(id) => OrderError::ProductNotFound(id),
            CatalogError::InsufficientStock {
                product_id,
                product_name,
                available,
                requested,
            } => OrderError::InsufficientStock {
                product_id,
                product_name,
                available,
                requested: u32::try_from(requested).unwrap_or(u32::MAX),
            },
            other => OrderError::Catalog(other),
        }
    }
}

impl From<StoreError> for OrderError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { key, .. } => OrderError::NotFound(OrderId::new(key)),
            StoreError::AlreadyExists { key, .. } => OrderError::AlreadyExists(OrderId::new(key)),
        }
    }
}
