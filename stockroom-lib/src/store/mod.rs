//! Local key-value storage
//!
//! Provides the [`LocalStore`] trait the table controller and the settings
//! context persist through, plus an in-memory and a SQLite implementation.
//! Values are plain strings (JSON text for structured values), mirroring
//! browser local storage.

mod memory;
mod sqlite;

pub use memory::*;
pub use sqlite::*;

use async_trait::async_trait;

use crate::error::StoreError;

/// Backend trait for string key-value storage.
///
/// Implementations are expected to be cheap to call and safe to share
/// between a view controller and its deferred writer task.
///
/// # Example
///
/// ```ignore
/// use stockroom_lib::store::{LocalStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// store.set("theme", "dark").await?;
/// assert_eq!(store.get("theme").await?.as_deref(), Some("dark"));
/// ```
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Get the value stored under a key.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store a value under a key, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a key. Deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Get all keys starting with a prefix, sorted.
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}
