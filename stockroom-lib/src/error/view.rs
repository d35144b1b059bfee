//! View persistence error types

use super::StoreError;

/// Errors that can occur while loading or saving a table view.
///
/// The table controller never surfaces these to its caller; they exist so
/// the lower layers can report what went wrong before it is logged and
/// swallowed.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// The backing store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The persisted value is not valid JSON.
    #[error("invalid view json: {0}")]
    Json(#[from] serde_json::Error),

    /// The persisted value is JSON but not a view object.
    #[error("malformed view: expected a JSON object, got {0}")]
    Malformed(&'static str),
}
