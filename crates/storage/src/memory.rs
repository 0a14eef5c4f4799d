use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{Result, StoreError, store::KeyValueStore};

/// In-memory keyed store.
///
/// Entries live in a single map guarded by an async `RwLock`. The write lock
/// is held only for the duration of one entry's read-modify-write, so
/// operations on different keys never wait on each other for longer than a
/// single map access.
pub struct InMemoryStore<K, V> {
    collection: &'static str,
    entries: Arc<RwLock<HashMap<K, V>>>,
}

impl<K, V> InMemoryStore<K, V> {
    /// Creates a new empty store. `collection` names the entity kind in errors.
    pub fn new(collection: &'static str) -> Self {
        Self {
            collection,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if the store holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn not_found(&self, key: &impl Display) -> StoreError {
        StoreError::NotFound {
            collection: self.collection,
            key: key.to_string(),
        }
    }
}

impl<K, V> Clone for InMemoryStore<K, V> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection,
            entries: Arc::clone(&self.entries),
        }
    }
}

#[async_trait]
impl<K, V> KeyValueStore<K, V> for InMemoryStore<K, V>
where
    K: Eq + Hash + Clone + Display + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Result<Option<V>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn insert(&self, key: K, value: V) -> Result<()> {
        let mut entries = self.entries.write().await;

        if entries.contains_key(&key) {
            return Err(StoreError::AlreadyExists {
                collection: self.collection,
                key: key.to_string(),
            });
        }

        entries.insert(key, value);
        Ok(())
    }

    async fn update<F, E>(&self, key: &K, f: F) -> std::result::Result<V, E>
    where
        F: FnOnce(&V) -> std::result::Result<V, E> + Send,
        E: From<StoreError> + Send,
    {
        let mut entries = self.entries.write().await;

        let current = entries.get(key).ok_or_else(|| self.not_found(key))?;
        let replacement = f(current)?;
        entries.insert(key.clone(), replacement.clone());

        Ok(replacement)
    }

    async fn remove(&self, key: &K) -> Result<V> {
        let mut entries = self.entries.write().await;
        entries.remove(key).ok_or_else(|| self.not_found(key))
    }

    async fn values(&self) -> Result<Vec<V>> {
        let entries = self.entries.read().await;
        Ok(entries.values().cloned().collect())
    }

    async fn scan<P>(&self, predicate: P) -> Result<Vec<V>>
    where
        P: Fn(&V) -> bool + Send,
    {
        let entries = self.entries.read().await;
        Ok(entries.values().filter(|v| predicate(v)).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Counter {
        owner: String,
        value: i64,
    }

    fn counter(owner: &str, value: i64) -> Counter {
        Counter {
            owner: owner.to_string(),
            value,
        }
    }

    #[derive(Debug, PartialEq)]
    enum TestError {
        Store(StoreError),
        Negative,
    }

    impl From<StoreError> for TestError {
        fn from(e: StoreError) -> Self {
            TestError::Store(e)
        }
    }

    #[tokio::test]
    async fn insert_and_get() {
        let store = InMemoryStore::new("counter");
        store
            .insert("a".to_string(), counter("alice", 1))
            .await
            .unwrap();

        let found = store.get(&"a".to_string()).await.unwrap();
        assert_eq!(found, Some(counter("alice", 1)));
        assert_eq!(store.get(&"b".to_string()).await.unwrap(), None);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn insert_duplicate_key_fails() {
        let store = InMemoryStore::new("counter");
        store
            .insert("a".to_string(), counter("alice", 1))
            .await
            .unwrap();

        let result = store.insert("a".to_string(), counter("bob", 2)).await;
        assert!(matches!(result, Err(StoreError::AlreadyExists { .. })));

        // Original entry untouched
        let found = store.get(&"a".to_string()).await.unwrap().unwrap();
        assert_eq!(found.owner, "alice");
    }

    #[tokio::test]
    async fn update_replaces_value() {
        let store = InMemoryStore::new("counter");
        store
            .insert("a".to_string(), counter("alice", 1))
            .await
            .unwrap();

        let updated: std::result::Result<Counter, TestError> = store
            .update(&"a".to_string(), |c| Ok(counter(&c.owner, c.value + 10)))
            .await;
        assert_eq!(updated.unwrap().value, 11);

        let found = store.get(&"a".to_string()).await.unwrap().unwrap();
        assert_eq!(found.value, 11);
    }

    #[tokio::test]
    async fn update_error_leaves_entry_unchanged() {
        let store = InMemoryStore::new("counter");
        store
            .insert("a".to_string(), counter("alice", 1))
            .await
            .unwrap();

        let result: std::result::Result<Counter, TestError> = store
            .update(&"a".to_string(), |c| {
                if c.value - 5 < 0 {
                    Err(TestError::Negative)
                } else {
                    Ok(counter(&c.owner, c.value - 5))
                }
            })
            .await;
        assert_eq!(result, Err(TestError::Negative));

        let found = store.get(&"a".to_string()).await.unwrap().unwrap();
        assert_eq!(found.value, 1);
    }

    #[tokio::test]
    async fn update_missing_key_is_not_found() {
        let store: InMemoryStore<String, Counter> = InMemoryStore::new("counter");

        let result: std::result::Result<Counter, TestError> = store
            .update(&"missing".to_string(), |c| Ok(c.clone()))
            .await;

        assert_eq!(
            result,
            Err(TestError::Store(StoreError::NotFound {
                collection: "counter",
                key: "missing".to_string(),
            }))
        );
    }

    #[tokio::test]
    async fn remove_returns_entry() {
        let store = InMemoryStore::new("counter");
        store
            .insert("a".to_string(), counter("alice", 1))
            .await
            .unwrap();

        let removed = store.remove(&"a".to_string()).await.unwrap();
        assert_eq!(removed.owner, "alice");
        assert!(store.is_empty().await);

        let again = store.remove(&"a".to_string()).await;
        assert!(matches!(again, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn scan_filters_values() {
        let store = InMemoryStore::new("counter");
        store
            .insert("a".to_string(), counter("alice", 1))
            .await
            .unwrap();
        store
            .insert("b".to_string(), counter("bob", 2))
            .await
            .unwrap();
        store
            .insert("c".to_string(), counter("alice", 3))
            .await
            .unwrap();

        let alice = store.scan(|c| c.owner == "alice").await.unwrap();
        assert_eq!(alice.len(), 2);

        let nobody = store.scan(|c| c.owner == "carol").await.unwrap();
        assert!(nobody.is_empty());

        assert_eq!(store.values().await.unwrap().len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_updates_are_not_lost() {
        let store = InMemoryStore::new("counter");
        store
            .insert("a".to_string(), counter("alice", 0))
            .await
            .unwrap();

        let tasks = (0..50).map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                let _: std::result::Result<Counter, TestError> = store
                    .update(&"a".to_string(), |c| Ok(counter(&c.owner, c.value + 1)))
                    .await;
            })
        });
        for handle in futures_util::future::join_all(tasks).await {
            handle.unwrap();
        }

        let found = store.get(&"a".to_string()).await.unwrap().unwrap();
        assert_eq!(found.value, 50);
    }
}
