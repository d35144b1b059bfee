//! Dynamic row record

use std::collections::HashMap;

use super::TableRow;
use super::Value;

/// A dynamic row: a mapping from column id to cell value.
///
/// Useful when the row shape is only known at runtime (for instance rows
/// decoded from an arbitrary JSON payload).
///
/// # Example
///
/// ```
/// use stockroom_lib::model::{Record, Value};
///
/// let record = Record::new()
///     .set("id", 1i64)
///     .set("name", "Widget");
///
/// assert_eq!(record.get("name"), Some(&Value::from("Widget")));
/// assert_eq!(record.get("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: HashMap<String, Value>,
}

impl Record {
    /// Creates a new empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field value, returning the record for chaining.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Sets a field value in place.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Gets a field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl TableRow for Record {
    fn value(&self, column_id: &str) -> Value {
        self.fields.get(column_id).cloned().unwrap_or(Value::Null)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_is_null() {
        let record = Record::new().set("id", 1i64);
        assert_eq!(record.value("id"), Value::Int(1));
        assert_eq!(record.value("name"), Value::Null);
    }

    #[test]
    fn test_from_iter() {
        let record: Record = [("a", 1i64), ("b", 2i64)].into_iter().collect();
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("b"), Some(&Value::Int(2)));
    }
}
