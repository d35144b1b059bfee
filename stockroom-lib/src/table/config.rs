//! Persisted view configuration.

use std::collections::BTreeMap;
use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::Column;
use crate::error::ViewError;

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order (A-Z, 0-9).
    Ascending,
    /// Descending order (Z-A, 9-0).
    Descending,
}

impl SortDirection {
    /// Header marker for this direction.
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "\u{2191}",
            SortDirection::Descending => "\u{2193}",
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Ascending => f.write_str("ascending"),
            SortDirection::Descending => f.write_str("descending"),
        }
    }
}

/// One entry of the sort list, stored as `{ "id": .., "desc": .. }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortEntry {
    /// The sorted column.
    pub id: String,
    /// `true` for descending.
    pub desc: bool,
}

impl SortEntry {
    /// Creates a sort entry.
    pub fn new(id: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            id: id.into(),
            desc: direction == SortDirection::Descending,
        }
    }

    /// The direction of this entry.
    pub fn direction(&self) -> SortDirection {
        if self.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }
}

/// Which edge a column is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinSide {
    /// Pinned to the left edge.
    Left,
    /// Pinned to the right edge.
    Right,
}

/// Pinned column ids per edge, in pin order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnPinning {
    /// Columns pinned to the left edge.
    pub left: Vec<String>,
    /// Columns pinned to the right edge.
    pub right: Vec<String>,
}

impl ColumnPinning {
    /// The side a column is pinned to, if any.
    pub fn side(&self, id: &str) -> Option<PinSide> {
        if self.left.iter().any(|c| c == id) {
            Some(PinSide::Left)
        } else if self.right.iter().any(|c| c == id) {
            Some(PinSide::Right)
        } else {
            None
        }
    }

    /// Pin a column to a side, or unpin it with `None`.
    ///
    /// Only `unpinned -> left`, `unpinned -> right` and `pinned -> unpinned`
    /// are transitions; anything else (including moving a pinned column to
    /// the other side without unpinning it first) is ignored. Returns
    /// whether the pinning changed.
    pub fn pin(&mut self, id: &str, side: Option<PinSide>) -> bool {
        match (self.side(id), side) {
            (None, Some(PinSide::Left)) => {
                self.left.push(id.to_string());
                true
            }
            (None, Some(PinSide::Right)) => {
                self.right.push(id.to_string());
                true
            }
            (Some(_), None) => {
                self.left.retain(|c| c != id);
                self.right.retain(|c| c != id);
                true
            }
            _ => false,
        }
    }

    /// Returns `true` if nothing is pinned.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }
}

/// The view state a table remembers per column schema.
///
/// Serialized as a camelCase JSON object:
///
/// ```json
/// {
///   "sorting": [{ "id": "name", "desc": false }],
///   "globalFilter": "widg",
///   "columnVisibility": { "status": false },
///   "columnPinning": { "left": ["id"], "right": [] },
///   "columnOrder": ["id", "name", "status"],
///   "groupBy": ""
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewConfig {
    /// Active sort. Holds at most one entry.
    pub sorting: Vec<SortEntry>,
    /// Free-text filter applied across all filterable columns.
    pub global_filter: String,
    /// Explicit visibility overrides; absent columns are visible.
    pub column_visibility: BTreeMap<String, bool>,
    /// Pinned columns.
    pub column_pinning: ColumnPinning,
    /// Display order of every column id.
    pub column_order: Vec<String>,
    /// Column rows are grouped by; empty for no grouping.
    pub group_by: String,
}

impl ViewConfig {
    /// The default view for a column set: natural order, nothing else.
    pub fn defaults_for(columns: &[Column]) -> Self {
        Self {
            column_order: columns.iter().map(|c| c.id.clone()).collect(),
            ..Self::default()
        }
    }

    /// Parses a persisted view.
    ///
    /// Each field is decoded on its own: a field with the wrong shape is
    /// left at its default instead of failing the whole view. Only input
    /// that is not a JSON object at all is an error.
    pub fn from_json(raw: &str) -> Result<Self, ViewError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let map = match value {
            serde_json::Value::Object(map) => map,
            other => return Err(ViewError::Malformed(json_kind(&other))),
        };

        let mut config = Self::default();
        if let Some(v) = field(&map, "sorting") {
            config.sorting = v;
        }
        if let Some(v) = field(&map, "globalFilter") {
            config.global_filter = v;
        }
        if let Some(v) = field(&map, "columnVisibility") {
            config.column_visibility = v;
        }
        if let Some(v) = field(&map, "columnPinning") {
            config.column_pinning = v;
        }
        if let Some(v) = field(&map, "columnOrder") {
            config.column_order = v;
        }
        if let Some(v) = field(&map, "groupBy") {
            config.group_by = v;
        }
        Ok(config)
    }

    /// Serializes the view for storage.
    pub fn to_json(&self) -> Result<String, ViewError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reconciles the view with the actual column set.
    ///
    /// References to unknown columns are dropped, duplicates removed, the
    /// sort list is cut to a single entry and `column_order` becomes a
    /// permutation of `columns` (stored order first, missing ids appended
    /// in definition order).
    pub fn normalize(&mut self, columns: &[Column]) {
        let known: HashSet<&str> = columns.iter().map(|c| c.id.as_str()).collect();

        self.sorting.retain(|s| known.contains(s.id.as_str()));
        self.sorting.truncate(1);

        self.column_visibility
            .retain(|id, _| known.contains(id.as_str()));

        let mut pinned = HashSet::new();
        self.column_pinning
            .left
            .retain(|id| known.contains(id.as_str()) && pinned.insert(id.clone()));
        self.column_pinning
            .right
            .retain(|id| known.contains(id.as_str()) && pinned.insert(id.clone()));

        let mut seen = HashSet::new();
        self.column_order
            .retain(|id| known.contains(id.as_str()) && seen.insert(id.clone()));
        for column in columns {
            if !seen.contains(&column.id) {
                self.column_order.push(column.id.clone());
            }
        }

        if !self.group_by.is_empty() && !known.contains(self.group_by.as_str()) {
            self.group_by.clear();
        }
    }

    /// The active sort, if any.
    pub fn sort(&self) -> Option<(&str, SortDirection)> {
        self.sorting
            .first()
            .map(|s| (s.id.as_str(), s.direction()))
    }

    /// The sort direction of a column, if it is the sorted one.
    pub fn sort_of(&self, id: &str) -> Option<SortDirection> {
        self.sort()
            .and_then(|(sorted, direction)| (sorted == id).then_some(direction))
    }

    /// Whether a column is visible.
    pub fn is_visible(&self, id: &str) -> bool {
        self.column_visibility.get(id).copied().unwrap_or(true)
    }

    /// The grouping column, if grouping is active.
    pub fn group_by(&self) -> Option<&str> {
        (!self.group_by.is_empty()).then_some(self.group_by.as_str())
    }
}

/// Builds the storage key for a column set.
///
/// The key is the namespace followed by the column ids joined with `|`, so
/// every table with the same schema shares one saved view.
pub fn storage_key(namespace: &str, columns: &[Column]) -> String {
    let ids: Vec<&str> = columns.iter().map(|c| c.id.as_str()).collect();
    format!("{}{}", namespace, ids.join("|"))
}

fn field<T: DeserializeOwned>(
    map: &serde_json::Map<String, serde_json::Value>,
    name: &str,
) -> Option<T> {
    let value = map.get(name)?;
    match serde_json::from_value(value.clone()) {
        Ok(v) => Some(v),
        Err(e) => {
            log::debug!("ignoring persisted view field '{}': {}", name, e);
            None
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", "ID"),
            Column::new("name", "Name"),
            Column::new("status", "Status"),
        ]
    }

    #[test]
    fn test_storage_key() {
        assert_eq!(
            storage_key("datatable:view:", &columns()),
            "datatable:view:id|name|status"
        );
    }

    #[test]
    fn test_json_shape() {
        let mut config = ViewConfig::defaults_for(&columns());
        config.sorting = vec![SortEntry::new("name", SortDirection::Descending)];
        config.group_by = "status".to_string();
        let json: serde_json::Value = serde_json::from_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(json["sorting"][0]["id"], "name");
        assert_eq!(json["sorting"][0]["desc"], true);
        assert_eq!(json["groupBy"], "status");
        assert_eq!(json["globalFilter"], "");
        assert!(json["columnPinning"]["left"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_from_json_keeps_good_fields() {
        let raw = r#"{"sorting": "nope", "globalFilter": "widg", "groupBy": 3}"#;
        let config = ViewConfig::from_json(raw).unwrap();
        assert!(config.sorting.is_empty());
        assert_eq!(config.global_filter, "widg");
        assert_eq!(config.group_by, "");
    }

    #[test]
    fn test_from_json_rejects_non_objects() {
        assert!(matches!(
            ViewConfig::from_json("[1,2]"),
            Err(ViewError::Malformed("array"))
        ));
        assert!(matches!(ViewConfig::from_json("{oops"), Err(ViewError::Json(_))));
    }

    #[test]
    fn test_normalize_repairs_order() {
        let mut config = ViewConfig {
            column_order: vec!["status".into(), "ghost".into(), "status".into()],
            ..ViewConfig::default()
        };
        config.normalize(&columns());
        assert_eq!(config.column_order, vec!["status", "id", "name"]);
    }

    #[test]
    fn test_normalize_drops_unknown_references() {
        let mut config = ViewConfig {
            sorting: vec![
                SortEntry::new("ghost", SortDirection::Ascending),
                SortEntry::new("name", SortDirection::Ascending),
                SortEntry::new("id", SortDirection::Ascending),
            ],
            column_visibility: BTreeMap::from([("ghost".to_string(), false)]),
            column_pinning: ColumnPinning {
                left: vec!["id".into(), "ghost".into()],
                right: vec!["id".into()],
            },
            group_by: "ghost".into(),
            ..ViewConfig::default()
        };
        config.normalize(&columns());
        assert_eq!(config.sort(), Some(("name", SortDirection::Ascending)));
        assert!(config.column_visibility.is_empty());
        assert_eq!(config.column_pinning.left, vec!["id"]);
        assert!(config.column_pinning.right.is_empty());
        assert_eq!(config.group_by(), None);
    }

    #[test]
    fn test_pin_transitions() {
        let mut pinning = ColumnPinning::default();
        assert!(pinning.pin("id", Some(PinSide::Left)));
        assert_eq!(pinning.side("id"), Some(PinSide::Left));

        // left -> right is not a transition
        assert!(!pinning.pin("id", Some(PinSide::Right)));
        assert_eq!(pinning.side("id"), Some(PinSide::Left));

        assert!(pinning.pin("id", None));
        assert_eq!(pinning.side("id"), None);
        assert!(!pinning.pin("id", None));

        assert!(pinning.pin("id", Some(PinSide::Right)));
        assert_eq!(pinning.right, vec!["id"]);
        assert!(pinning.left.is_empty());
    }
}
