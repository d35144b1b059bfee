//! Local store error types

/// Errors raised by a [`LocalStore`](crate::store::LocalStore) backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The SQLite backend failed.
    #[error("database error: {0}")]
    Database(#[from] async_sqlite::Error),

    /// The backend refused the write (e.g. a size quota was hit).
    #[error("store rejected write for '{key}': {reason}")]
    Rejected {
        /// The key being written.
        key: String,
        /// Why the backend refused it.
        reason: String,
    },
}

impl StoreError {
    /// Creates a new rejected-write error.
    pub fn rejected(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
