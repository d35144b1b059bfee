//! Row model pipeline: filter, sort, group, paginate.
//!
//! All functions here are pure over `(rows, view state)`. The controller
//! reruns them after every change; row counts are in the hundreds, so no
//! incremental bookkeeping is kept.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::ops::Range;

use super::Column;
use super::SortDirection;
use crate::model::TableRow;

/// Returns the indices of rows that pass the global filter and every
/// column filter, in input order.
///
/// Matching is a case-insensitive substring test on each cell's string
/// coercion. The global filter passes when any filterable column holds a
/// searchable value (text, number or date-time) that matches; boolean and
/// null cells never satisfy it. Column filters test every value kind and are
/// ANDed with the global filter and with each other. Empty filter text
/// matches everything.
pub fn filter_rows<T: TableRow>(
    rows: &[T],
    columns: &[Column],
    global_filter: &str,
    column_filters: &BTreeMap<String, String>,
) -> Vec<usize> {
    let global = global_filter.to_lowercase();
    let searchable: Vec<&Column> = columns.iter().filter(|c| c.filterable).collect();
    let per_column: Vec<(&str, String)> = column_filters
        .iter()
        .filter(|(_, text)| !text.is_empty())
        .map(|(id, text)| (id.as_str(), text.to_lowercase()))
        .collect();

    rows.iter()
        .enumerate()
        .filter(|(_, row)| {
            let global_ok = global.is_empty()
                || searchable
                    .iter()
                    .any(|c| {
                        let value = row.value(&c.id);
                        value.is_searchable() && value.contains_lowercase(&global)
                    });
            global_ok
                && per_column
                    .iter()
                    .all(|(id, text)| row.value(id).contains_lowercase(text))
        })
        .map(|(i, _)| i)
        .collect()
}

/// Sorts row indices by one column.
///
/// The sort is stable: rows with equal keys keep their relative order in
/// both directions, so descending is the exact reverse of ascending
/// whenever keys are distinct.
pub fn sort_rows<T: TableRow>(
    indices: &mut [usize],
    rows: &[T],
    column_id: &str,
    direction: SortDirection,
) {
    let keys: HashMap<usize, _> = indices
        .iter()
        .map(|&i| (i, rows[i].value(column_id)))
        .collect();
    indices.sort_by(|a, b| {
        let ordering = keys[a].compare(&keys[b]);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// A band of rows sharing one group key.
#[derive(Debug)]
pub struct RowGroup<'a, T> {
    /// The string coercion of the grouped column's value.
    pub key: String,
    /// The rows in this group, in processed order.
    pub rows: Vec<&'a T>,
}

impl<T> RowGroup<'_, T> {
    /// Header band text, e.g. `status: true — 2 row(s)`.
    pub fn label(&self, column_id: &str) -> String {
        format!(
            "{}: {} \u{2014} {} row(s)",
            column_id,
            self.key,
            self.rows.len()
        )
    }

    /// Number of rows in the group.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the group has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Partitions rows by a column's group key.
///
/// Groups appear in the order their key is first encountered, not sorted.
pub fn group_rows<'a, T: TableRow>(rows: &[&'a T], column_id: &str) -> Vec<RowGroup<'a, T>> {
    let mut groups: Vec<RowGroup<'a, T>> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for &row in rows {
        let key = row.value(column_id).group_key();
        match positions.get(&key) {
            Some(&pos) => groups[pos].rows.push(row),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push(RowGroup {
                    key,
                    rows: vec![row],
                });
            }
        }
    }
    groups
}

/// Number of pages needed for `total` rows.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1))
}

/// Index range of one page, clamped to the row count.
pub fn page_range(total: usize, page_index: usize, page_size: usize) -> Range<usize> {
    let size = page_size.max(1);
    let start = page_index.saturating_mul(size).min(total);
    let end = start.saturating_add(size).min(total);
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", "ID"),
            Column::new("name", "Name"),
            Column::new("status", "Status"),
        ]
    }

    fn rows() -> Vec<Record> {
        vec![
            Record::new().set("id", 1i64).set("name", "Widget").set("status", true),
            Record::new().set("id", 2i64).set("name", "Gadget").set("status", false),
            Record::new().set("id", 3i64).set("name", "Widget Pro").set("status", true),
        ]
    }

    #[test]
    fn test_no_filter_keeps_order() {
        let rows = rows();
        assert_eq!(
            filter_rows(&rows, &columns(), "", &BTreeMap::new()),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_global_filter_case_insensitive() {
        let rows = rows();
        assert_eq!(
            filter_rows(&rows, &columns(), "WIDG", &BTreeMap::new()),
            vec![0, 2]
        );
    }

    #[test]
    fn test_global_filter_skips_unfilterable_columns() {
        let rows = rows();
        let columns = vec![
            Column::new("id", "ID").filterable(false),
            Column::new("name", "Name"),
        ];
        assert!(filter_rows(&rows, &columns, "2", &BTreeMap::new()).is_empty());
    }

    #[test]
    fn test_global_filter_ignores_flags() {
        let rows = rows();
        for text in ["true", "ue", "als", "false"] {
            assert!(
                filter_rows(&rows, &columns(), text, &BTreeMap::new()).is_empty(),
                "'{}' matched a status flag",
                text
            );
        }

        let filters = BTreeMap::from([("status".to_string(), "true".to_string())]);
        assert_eq!(filter_rows(&rows, &columns(), "", &filters), vec![0, 2]);
    }

    #[test]
    fn test_column_filters_and_together() {
        let rows = rows();
        let filters = BTreeMap::from([
            ("name".to_string(), "widget".to_string()),
            ("id".to_string(), "3".to_string()),
        ]);
        assert_eq!(filter_rows(&rows, &columns(), "", &filters), vec![2]);
        assert_eq!(filter_rows(&rows, &columns(), "gadget", &filters), Vec::<usize>::new());
    }

    #[test]
    fn test_sort_reverses() {
        let rows = rows();
        let mut asc = vec![0, 1, 2];
        sort_rows(&mut asc, &rows, "name", SortDirection::Ascending);
        let mut desc = vec![0, 1, 2];
        sort_rows(&mut desc, &rows, "name", SortDirection::Descending);
        assert_eq!(asc, vec![1, 0, 2]);
        desc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let rows = rows();
        let mut indices = vec![0, 1, 2];
        sort_rows(&mut indices, &rows, "status", SortDirection::Descending);
        assert_eq!(indices, vec![0, 2, 1]);
    }

    #[test]
    fn test_group_encounter_order() {
        let rows = vec![
            Record::new().set("c", "A"),
            Record::new().set("c", "B"),
            Record::new().set("c", "A"),
        ];
        let refs: Vec<&Record> = rows.iter().collect();
        let groups = group_rows(&refs, "c");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "A");
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1].key, "B");
        assert_eq!(groups[1].len(), 1);
        assert_eq!(groups[0].label("c"), "c: A \u{2014} 2 row(s)");
    }

    #[test]
    fn test_group_coerces_and_buckets_missing() {
        let rows = vec![
            Record::new().set("c", 0i64),
            Record::new().set("c", "0"),
            Record::new(),
            Record::new().set("c", crate::model::Value::Null),
        ];
        let refs: Vec<&Record> = rows.iter().collect();
        let groups = group_rows(&refs, "c");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "0");
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1].key, "\u{2014}");
        assert_eq!(groups[1].len(), 2);
    }

    #[test]
    fn test_pages() {
        assert_eq!(page_count(22, 10), 3);
        assert_eq!(page_count(20, 10), 2);
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_range(22, 2, 10), 20..22);
        assert_eq!(page_range(22, 5, 10), 22..22);
    }
}
