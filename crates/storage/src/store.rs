use std::fmt::Display;
use std::hash::Hash;

use async_trait::async_trait;

use crate::{Result, StoreError};

/// Core trait for keyed entity stores.
///
/// Entries are treated as immutable values: writers never mutate a stored
/// value in place, they compute a replacement from the current value and the
/// store swaps it in atomically. All implementations must be thread-safe
/// (Send + Sync).
#[async_trait]
pub trait KeyValueStore<K, V>: Send + Sync
where
    K: Eq + Hash + Clone + Display + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Retrieves the entry stored under `key`.
    ///
    /// Returns None if no entry exists.
    async fn get(&self, key: &K) -> Result<Option<V>>;

    /// Inserts a new entry.
    ///
    /// Fails with `AlreadyExists` if the key is taken; the existing entry is
    /// left untouched.
    async fn insert(&self, key: K, value: V) -> Result<()>;

    /// Replaces the entry under `key` with the value computed by `f`.
    ///
    /// `f` receives the current value and runs while the store holds its
    /// write lock, so no other writer can interleave between the read and
    /// the write. If `f` returns an error the entry is left unchanged.
    /// Fails with `NotFound` (converted into `E`) if the key is absent.
    ///
    /// Returns the newly stored value.
    async fn update<F, E>(&self, key: &K, f: F) -> std::result::Result<V, E>
    where
        F: FnOnce(&V) -> std::result::Result<V, E> + Send,
        E: From<StoreError> + Send;

    /// Removes and returns the entry under `key`.
    async fn remove(&self, key: &K) -> Result<V>;

    /// Returns all stored values, in no particular order.
    async fn values(&self) -> Result<Vec<V>>;

    /// Returns all stored values matching `predicate`.
    ///
    /// Scans every entry; there is no secondary index.
    async fn scan<P>(&self, predicate: P) -> Result<Vec<V>>
    where
        P: Fn(&V) -> bool + Send;
}
