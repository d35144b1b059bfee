//! The row abstraction tables operate on.

use super::Value;

/// Trait for rows that can be displayed in a [`TableView`](crate::table::TableView).
///
/// The table never inspects a row's shape beyond asking it for the value of
/// a column. A column the row does not know about should return
/// [`Value::Null`], which renders as an empty cell.
///
/// # Example
///
/// ```
/// use stockroom_lib::model::{TableRow, Value};
///
/// #[derive(Clone)]
/// struct Widget {
///     id: i64,
///     name: String,
/// }
///
/// impl TableRow for Widget {
///     fn value(&self, column_id: &str) -> Value {
///         match column_id {
///             "id" => Value::from(self.id),
///             "name" => Value::from(self.name.as_str()),
///             _ => Value::Null,
///         }
///     }
/// }
/// ```
pub trait TableRow: Clone + Send + Sync + 'static {
    /// Return the cell value for the given column.
    fn value(&self, column_id: &str) -> Value;
}
