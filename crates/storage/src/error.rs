use thiserror::Error;

/// Errors that can occur when interacting with a keyed store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No entry exists under the given key.
    #[error("{collection} entry not found: {key}")]
    NotFound {
        collection: &'static str,
        key: String,
    },

    /// An entry already exists under the given key.
    #[error("{collection} entry already exists: {key}")]
    AlreadyExists {
        collection: &'static str,
        key: String,
    },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
