//! User directory: registration, credential checks, and roles.

mod model;
mod password;
mod service;
mod store;

pub use model::{Credentials, RegisterUser, Role, User};
pub use service::UserDirectory;
pub use store::{InMemoryUserStore, UserStore};

use common::UserId;
use storage::StoreError;
use thiserror::Error;

use crate::error::ErrorKind;

/// Errors that can occur in the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    /// Email is required.
    #[error("Email is required")]
    EmailRequired,

    /// Email is not a plausible address.
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// Password is required.
    #[error("Password is required")]
    PasswordRequired,

    /// The email is already registered.
    #[error("Email already registered: {0}")]
    AlreadyExists(String),

    /// Unknown email or wrong password. The two cases are not distinguished.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// User not found.
    #[error("User not found: {0}")]
    NotFound(UserId),

    /// The password hasher failed.
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

impl UserError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            UserError::EmailRequired | UserError::InvalidEmail(_) | UserError::PasswordRequired => {
                ErrorKind::Validation
            }
            UserError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            UserError::InvalidCredentials => ErrorKind::AuthenticationFailure,
            UserError::NotFound(_) => ErrorKind::NotFound,
            UserError::PasswordHash(_) => ErrorKind::Internal,
        }
    }
}

impl From<StoreError> for UserError {
    fn from(e: StoreError) -> Self {
        match e {
            // The user store is keyed by email.
            StoreError::AlreadyExists { key, .. } => UserError::AlreadyExists(key),
            StoreError::NotFound { key, .. } => UserError::NotFound(UserId::new(key)),
        }
    }
}
