//! Domain layer for the storefront backend.
//!
//! This crate provides:
//! - The product catalog with validated stock adjustments
//! - Order placement with stock reservation and rollback
//! - The order status state machine, which returns stock on cancellation
//! - The user directory with argon2 credential checks

pub mod catalog;
pub mod error;
pub mod money;
pub mod order;
pub mod user;

pub use catalog::{
    CatalogError, CatalogService, InMemoryProductStore, MAX_PRICE, MAX_STOCK, Product,
    ProductDraft, ProductStore,
};
pub use error::{DomainError, ErrorKind};
pub use money::{Money, TaxRate};
pub use order::{
    InMemoryOrderStore, LineRequest, Order, OrderError, OrderLine, OrderService, OrderStatus,
    OrderStore, PlaceOrder, ProductCatalog, UpdateOrderStatus,
};
pub use user::{
    Credentials, InMemoryUserStore, RegisterUser, Role, User, UserDirectory, UserError, UserStore,
};
