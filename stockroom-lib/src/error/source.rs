//! Data source error types

/// Errors raised by a [`DataSource`](crate::inventory::DataSource).
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The upstream backend could not be reached.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with something that could not be decoded.
    #[error("invalid payload for {entity}: {source}")]
    Decode {
        /// The entity collection being fetched.
        entity: &'static str,
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}
