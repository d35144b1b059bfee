//! SQLite store with in-memory read cache.

use std::path::Path;

use async_sqlite::Client;
use async_sqlite::ClientBuilder;
use async_sqlite::JournalMode;
use async_sqlite::rusqlite;
use async_trait::async_trait;
use dashmap::DashMap;

use super::LocalStore;
use crate::error::StoreError;

/// A persistent store backed by SQLite.
///
/// Data persists across process restarts. Reads are served from a DashMap
/// cache once a key has been seen.
///
/// # Example
///
/// ```ignore
/// use stockroom_lib::store::SqliteStore;
///
/// // File-based store
/// let store = SqliteStore::open("stockroom.db").await?;
///
/// // In-memory store (for testing)
/// let store = SqliteStore::open_in_memory().await?;
/// ```
pub struct SqliteStore {
    client: Client,
    cache: DashMap<String, String>,
}

impl SqliteStore {
    /// Opens a SQLite store at the specified path.
    ///
    /// Creates the database file and table if they don't exist.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let client = ClientBuilder::new()
            .path(path)
            .journal_mode(JournalMode::Wal)
            .open()
            .await?;

        Self::init_schema(&client).await?;

        Ok(Self {
            client,
            cache: DashMap::new(),
        })
    }

    /// Opens an in-memory SQLite store.
    ///
    /// Useful for testing. Data is lost when the store is dropped.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let client = ClientBuilder::new().path(":memory:").open().await?;

        Self::init_schema(&client).await?;

        Ok(Self {
            client,
            cache: DashMap::new(),
        })
    }

    async fn init_schema(client: &Client) -> Result<(), StoreError> {
        client
            .conn(|conn| {
                conn.execute(
                    "CREATE TABLE IF NOT EXISTS local_store (
                        key TEXT PRIMARY KEY,
                        value TEXT NOT NULL
                    )",
                    [],
                )
            })
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl LocalStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if let Some(value) = self.cache.get(key) {
            return Ok(Some(value.clone()));
        }

        let key_owned = key.to_string();
        let result = self
            .client
            .conn(move |conn| {
                let mut stmt = conn.prepare("SELECT value FROM local_store WHERE key = ?")?;
                let mut rows = stmt.query([&key_owned])?;
                match rows.next()? {
                    Some(row) => Ok(Some(row.get::<_, String>(0)?)),
                    None => Ok(None),
                }
            })
            .await?;

        if let Some(ref value) = result {
            self.cache.insert(key.to_string(), value.clone());
        }

        Ok(result)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let key_owned = key.to_string();
        let value_owned = value.to_string();

        self.client
            .conn(move |conn| {
                conn.execute(
                    "INSERT INTO local_store (key, value) VALUES (?, ?)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    rusqlite::params![&key_owned, &value_owned],
                )
            })
            .await?;

        self.cache.insert(key.to_string(), value.to_string());

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let key_owned = key.to_string();

        self.client
            .conn(move |conn| conn.execute("DELETE FROM local_store WHERE key = ?", [&key_owned]))
            .await?;

        self.cache.remove(key);

        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        // substr() instead of LIKE so '_' and '%' in column ids match literally
        let prefix = prefix.to_string();
        let keys = self
            .client
            .conn(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT key FROM local_store
                     WHERE substr(key, 1, length(?1)) = ?1
                     ORDER BY key",
                )?;
                let rows = stmt.query_map([&prefix], |row| row.get(0))?;
                rows.collect::<Result<Vec<String>, _>>()
            })
            .await?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
        store.set("k", "v1").await.unwrap();
        store.set("k", "v2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_prefix_is_literal() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        store.set("view:item_name", "{}").await.unwrap();
        store.set("view:itemXname", "{}").await.unwrap();
        let keys = store.keys_with_prefix("view:item_").await.unwrap();
        assert_eq!(keys, vec!["view:item_name".to_string()]);
    }
}
