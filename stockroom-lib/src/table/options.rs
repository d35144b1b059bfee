//! Table configuration

use std::time::Duration;

/// Default namespace prefixed to every persisted view key.
pub const DEFAULT_NAMESPACE: &str = "datatable:view:";

/// Configuration for a [`TableView`](super::TableView) instance.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use stockroom_lib::table::TableOptions;
///
/// let options = TableOptions::default()
///     .with_page_size(25)
///     .with_persist_delay(Duration::from_millis(100));
/// assert_eq!(options.page_size, 25);
/// ```
#[derive(Debug, Clone)]
pub struct TableOptions {
    /// Rows per page.
    ///
    /// Default: 10
    pub page_size: usize,

    /// How long the view must stay unchanged before it is written.
    ///
    /// Default: 250 ms
    pub persist_delay: Duration,

    /// Prefix of the storage key.
    ///
    /// Default: `"datatable:view:"`
    pub namespace: String,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            page_size: 10,
            persist_delay: Duration::from_millis(250),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl TableOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size. A size of zero is treated as one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Sets the persistence debounce delay.
    pub fn with_persist_delay(mut self, delay: Duration) -> Self {
        self.persist_delay = delay;
        self
    }

    /// Sets the storage key namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}
