//! Domain error types.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::order::OrderError;
use crate::user::UserError;

/// Coarse classification of domain failures.
///
/// Transport adapters map these to their own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or invalid input fields.
    Validation,
    /// A product, order, or user id does not resolve.
    NotFound,
    /// Requested quantity exceeds available stock.
    InsufficientStock,
    /// Status change not permitted from the current state.
    InvalidTransition,
    /// Duplicate id or email on creation.
    AlreadyExists,
    /// Credential mismatch.
    AuthenticationFailure,
    /// A concurrent change or a failed compensation prevented the operation.
    Conflict,
    /// Unexpected failure.
    Internal,
}

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An error occurred in the product catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// An error occurred while placing or updating an order.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// An error occurred in the user directory.
    #[error(transparent)]
    User(#[from] UserError),
}

impl DomainError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Catalog(e) => e.kind(),
            DomainError::Order(e) => e.kind(),
            DomainError::User(e) => e.kind(),
        }
    }
}
