//! In-memory store implementation using DashMap

use async_trait::async_trait;
use dashmap::DashMap;

use super::LocalStore;
use crate::error::StoreError;

/// An in-memory store backed by a concurrent hash map.
///
/// Data is lost when the process exits. Used by tests and by the CLI's
/// `--memory` mode.
///
/// An optional quota limits the size of a single value, which lets tests
/// exercise the write-failure path the way a full browser storage would.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that rejects values longer than `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: DashMap::new(),
            quota: Some(bytes),
        }
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl LocalStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota
            && value.len() > quota
        {
            return Err(StoreError::rejected(key, "quota exceeded"));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryStore::new();
        store.set("a", "1").await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));
        store.remove("a").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);
        // Removing again is fine
        store.remove("a").await.unwrap();
    }

    #[tokio::test]
    async fn test_keys_with_prefix() {
        let store = MemoryStore::new();
        store.set("view:b", "{}").await.unwrap();
        store.set("view:a", "{}").await.unwrap();
        store.set("theme", "dark").await.unwrap();
        assert_eq!(
            store.keys_with_prefix("view:").await.unwrap(),
            vec!["view:a".to_string(), "view:b".to_string()]
        );
    }

    #[tokio::test]
    async fn test_quota_rejects_large_values() {
        let store = MemoryStore::with_quota(4);
        assert!(store.set("k", "1234").await.is_ok());
        assert!(matches!(
            store.set("k", "12345").await,
            Err(StoreError::Rejected { .. })
        ));
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("1234"));
    }
}
