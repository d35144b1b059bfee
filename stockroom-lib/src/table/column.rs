//! Column definitions.

use std::fmt;
use std::sync::Arc;

use crate::model::{TableRow, Value};

/// Custom cell renderer: turns a raw cell value into display text.
pub type CellFormatter = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// A table column definition.
///
/// Columns are sortable and filterable unless told otherwise. The id is
/// what rows are asked for and what the persisted view refers to; the
/// header is display-only.
#[derive(Clone)]
pub struct Column {
    /// Unique identifier for this column.
    pub id: String,
    /// Header text displayed at the top.
    pub header: String,
    /// Whether clicking the header cycles the sort.
    pub sortable: bool,
    /// Whether the column takes part in global and per-column filtering.
    pub filterable: bool,
    formatter: Option<CellFormatter>,
}

impl Column {
    /// Create a new column with the given id and header.
    pub fn new(id: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            sortable: true,
            filterable: true,
            formatter: None,
        }
    }

    /// Enable or disable sorting on this column.
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Enable or disable filtering on this column.
    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    /// Set a custom cell renderer.
    pub fn cell(mut self, formatter: impl Fn(&Value) -> String + Send + Sync + 'static) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    /// Render a value as display text, using the custom renderer if set.
    pub fn format(&self, value: &Value) -> String {
        match &self.formatter {
            Some(formatter) => formatter(value),
            None => value.to_string(),
        }
    }

    /// Render this column's cell for a row.
    pub fn render<T: TableRow>(&self, row: &T) -> String {
        self.format(&row.value(&self.id))
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}

/// Badge-style renderer for boolean status columns.
pub fn active_badge(value: &Value) -> String {
    match value {
        Value::Bool(true) => "Active".to_string(),
        Value::Bool(false) => "Inactive".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let column = Column::new("name", "Name");
        assert!(column.sortable);
        assert!(column.filterable);
        assert_eq!(column.format(&Value::from("x")), "x");
    }

    #[test]
    fn test_custom_renderer() {
        let column = Column::new("status", "Status").cell(active_badge);
        assert_eq!(column.format(&Value::Bool(true)), "Active");
        assert_eq!(column.format(&Value::Bool(false)), "Inactive");
        assert_eq!(column.format(&Value::Null), "");
    }
}
