//! Table view controller.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::{debug, info, warn};

use super::config::storage_key;
use super::persist::ViewWriter;
use super::pipeline::{self, RowGroup};
use super::{Column, PinSide, SortDirection, SortEntry, TableOptions, ViewConfig};
use crate::error::ViewError;
use crate::export::ExportData;
use crate::model::TableRow;
use crate::store::LocalStore;

/// Direction for [`TableView::move_column`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// Swap with the previous column in the order.
    Earlier,
    /// Swap with the next column in the order.
    Later,
}

/// Callback invoked by [`TableView::export_csv`].
pub type ExportHandler = Box<dyn FnMut(&ExportData) + Send>;

/// Message shown when no row survives filtering.
pub const EMPTY_MESSAGE: &str = "No results";

/// A filterable, sortable, groupable, column-configurable table over an
/// arbitrary row set, which remembers its view per column schema.
///
/// `TableView<T>` owns:
/// - the rows and column definitions supplied by the caller
/// - the persisted [`ViewConfig`] (sort, global filter, visibility,
///   pinning, order, grouping)
/// - per-column filters and the page cursor, which are not persisted
///
/// Every mutation recomputes the processed row set and, for persisted
/// state, schedules a debounced write to the [`LocalStore`]. Persistence
/// failures are logged and otherwise ignored; the in-memory view stays
/// authoritative.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use stockroom_lib::model::Record;
/// use stockroom_lib::store::MemoryStore;
/// use stockroom_lib::table::{Column, TableOptions, TableView};
///
/// let columns = vec![Column::new("id", "ID"), Column::new("name", "Name")];
/// let rows = vec![Record::new().set("id", 1i64).set("name", "Widget")];
/// let mut view = TableView::open(columns, rows, Arc::new(MemoryStore::new()), TableOptions::default()).await;
///
/// view.set_global_filter("widg");
/// assert_eq!(view.row_count(), 1);
/// view.close().await;
/// ```
pub struct TableView<T: TableRow> {
    columns: Vec<Column>,
    rows: Vec<T>,
    config: ViewConfig,
    column_filters: BTreeMap<String, String>,
    /// Indices into `rows` after filtering and sorting.
    processed: Vec<usize>,
    page_index: usize,
    page_size: usize,
    storage_key: String,
    writer: ViewWriter,
    export_handler: Option<ExportHandler>,
}

impl<T: TableRow> TableView<T> {
    /// Create a table view, restoring the saved view for this column set.
    ///
    /// A missing or unreadable saved view falls back to the defaults: no
    /// sort, no filters, all columns visible in definition order, no
    /// grouping.
    pub async fn open(
        columns: Vec<Column>,
        rows: Vec<T>,
        store: Arc<dyn LocalStore>,
        options: TableOptions,
    ) -> Self {
        let storage_key = storage_key(&options.namespace, &columns);

        let mut config = match load(store.as_ref(), &storage_key).await {
            Ok(Some(config)) => config,
            Ok(None) => ViewConfig::default(),
            Err(e) => {
                debug!("ignoring saved view '{}': {}", storage_key, e);
                ViewConfig::default()
            }
        };
        config.normalize(&columns);

        let writer = ViewWriter::new(store, storage_key.clone(), options.persist_delay);
        let mut view = Self {
            columns,
            rows,
            config,
            column_filters: BTreeMap::new(),
            processed: Vec::new(),
            page_index: 0,
            page_size: options.page_size.max(1),
            storage_key,
            writer,
            export_handler: None,
        };
        view.recompute();
        view
    }

    /// Register the CSV export callback.
    pub fn on_export_csv(mut self, handler: impl FnMut(&ExportData) + Send + 'static) -> Self {
        self.export_handler = Some(Box::new(handler));
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// The key the view is persisted under.
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// The current view configuration.
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// All column definitions, in definition order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by id.
    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// The per-column filter text for a column, if set.
    pub fn column_filter(&self, id: &str) -> Option<&str> {
        self.column_filters.get(id).map(String::as_str)
    }

    /// Returns `true` if a debounced write has not landed yet.
    pub fn has_pending_write(&self) -> bool {
        self.writer.has_pending()
    }

    // -------------------------------------------------------------------------
    // Rows
    // -------------------------------------------------------------------------

    /// Replace the row set. The view configuration is kept.
    pub fn set_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
        self.page_index = 0;
        self.recompute();
    }

    /// Number of rows before filtering.
    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of rows after filtering.
    pub fn row_count(&self) -> usize {
        self.processed.len()
    }

    /// Returns `true` if no row survives filtering.
    pub fn is_empty(&self) -> bool {
        self.processed.is_empty()
    }

    /// Filtered and sorted rows, across all pages.
    pub fn rows(&self) -> Vec<&T> {
        self.processed.iter().map(|&i| &self.rows[i]).collect()
    }

    /// Rows to display right now.
    ///
    /// While grouping is active pagination is off and this is every
    /// filtered row.
    pub fn page_rows(&self) -> Vec<&T> {
        if self.is_grouped() {
            return self.rows();
        }
        let range = pipeline::page_range(self.processed.len(), self.page_index, self.page_size);
        self.processed[range].iter().map(|&i| &self.rows[i]).collect()
    }

    /// Rows partitioned by the grouping column, or `None` when not grouped.
    pub fn groups(&self) -> Option<Vec<RowGroup<'_, T>>> {
        let column = self.config.group_by()?;
        Some(pipeline::group_rows(&self.rows(), column))
    }

    /// Whether grouping is active.
    pub fn is_grouped(&self) -> bool {
        self.config.group_by().is_some()
    }

    // -------------------------------------------------------------------------
    // Columns
    // -------------------------------------------------------------------------

    /// Visible columns in display order: left-pinned, then unpinned in
    /// `column_order`, then right-pinned.
    pub fn visible_columns(&self) -> Vec<&Column> {
        let pinning = &self.config.column_pinning;
        let center = self
            .config
            .column_order
            .iter()
            .filter(|id| pinning.side(id).is_none());

        pinning
            .left
            .iter()
            .chain(center)
            .chain(pinning.right.iter())
            .filter(|id| self.config.is_visible(id))
            .filter_map(|id| self.column(id))
            .collect()
    }

    /// Display text of one cell, through the column's renderer.
    ///
    /// Unknown columns render as an empty string.
    pub fn cell_text(&self, row: &T, column_id: &str) -> String {
        self.column(column_id)
            .map(|column| column.render(row))
            .unwrap_or_default()
    }

    /// Whether a column is visible.
    pub fn is_column_visible(&self, id: &str) -> bool {
        self.config.is_visible(id)
    }

    /// Show or hide a column. Hidden columns keep their place in the order.
    pub fn set_column_visibility(&mut self, id: &str, visible: bool) {
        if !self.known(id) {
            return;
        }
        self.config.column_visibility.insert(id.to_string(), visible);
        self.changed();
    }

    /// Swap a column with its neighbour in the order.
    ///
    /// Returns `false` (and changes nothing) at either end of the order or
    /// for an unknown column.
    pub fn move_column(&mut self, id: &str, direction: MoveDirection) -> bool {
        let order = &mut self.config.column_order;
        let Some(idx) = order.iter().position(|c| c == id) else {
            debug!("move of unknown column '{}' ignored", id);
            return false;
        };
        let swap_with = match direction {
            MoveDirection::Earlier => idx.checked_sub(1),
            MoveDirection::Later => Some(idx + 1).filter(|&i| i < order.len()),
        };
        let Some(swap_with) = swap_with else {
            return false;
        };
        order.swap(idx, swap_with);
        self.changed();
        true
    }

    /// Pin a column to a side, or unpin it with `None`.
    ///
    /// See [`ColumnPinning::pin`](super::ColumnPinning::pin) for the allowed
    /// transitions. Returns whether the pinning changed.
    pub fn pin_column(&mut self, id: &str, side: Option<PinSide>) -> bool {
        if !self.known(id) {
            return false;
        }
        let changed = self.config.column_pinning.pin(id, side);
        if changed {
            self.changed();
        }
        changed
    }

    /// The side a column is pinned to.
    pub fn pin_side(&self, id: &str) -> Option<PinSide> {
        self.config.column_pinning.side(id)
    }

    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------

    /// Set the free-text filter matched against every filterable column.
    pub fn set_global_filter(&mut self, text: impl Into<String>) {
        self.config.global_filter = text.into();
        self.page_index = 0;
        self.recompute();
        self.changed();
    }

    /// Set the filter text for one column. Empty text clears it.
    pub fn set_column_filter(&mut self, id: &str, text: impl Into<String>) {
        match self.column(id) {
            Some(column) if column.filterable => {}
            Some(_) => {
                debug!("column '{}' is not filterable", id);
                return;
            }
            None => {
                debug!("filter on unknown column '{}' ignored", id);
                return;
            }
        }
        let text = text.into();
        if text.is_empty() {
            self.column_filters.remove(id);
        } else {
            self.column_filters.insert(id.to_string(), text);
        }
        self.page_index = 0;
        self.recompute();
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// The active sort.
    pub fn sort(&self) -> Option<(&str, SortDirection)> {
        self.config.sort()
    }

    /// Cycle a column through unsorted, ascending, descending, unsorted.
    ///
    /// Sorting a different column replaces the previous sort. Returns the
    /// column's new direction; unsortable and unknown columns stay `None`.
    pub fn toggle_sort(&mut self, id: &str) -> Option<SortDirection> {
        match self.column(id) {
            Some(column) if column.sortable => {}
            _ => {
                debug!("column '{}' cannot be sorted", id);
                return None;
            }
        }
        let next = match self.config.sort_of(id) {
            None => Some(SortDirection::Ascending),
            Some(SortDirection::Ascending) => Some(SortDirection::Descending),
            Some(SortDirection::Descending) => None,
        };
        self.config.sorting = next
            .map(|direction| vec![SortEntry::new(id, direction)])
            .unwrap_or_default();
        self.page_index = 0;
        self.recompute();
        self.changed();
        next
    }

    // -------------------------------------------------------------------------
    // Grouping
    // -------------------------------------------------------------------------

    /// Group rows by a column, or stop grouping with `None`.
    ///
    /// Grouping covers the whole filtered set and turns pagination off.
    pub fn set_group_by(&mut self, id: Option<&str>) {
        match id {
            Some(id) if !self.known(id) => return,
            Some(id) => self.config.group_by = id.to_string(),
            None => self.config.group_by.clear(),
        }
        self.page_index = 0;
        self.changed();
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    /// Current zero-based page.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Rows per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages. Zero when nothing matches; one while grouped.
    pub fn page_count(&self) -> usize {
        if self.is_grouped() {
            return 1;
        }
        pipeline::page_count(self.processed.len(), self.page_size)
    }

    /// Whether a next page exists.
    pub fn can_next_page(&self) -> bool {
        self.page_index + 1 < self.page_count()
    }

    /// Whether a previous page exists.
    pub fn can_previous_page(&self) -> bool {
        !self.is_grouped() && self.page_index > 0
    }

    /// Advance one page. No-op on the last page.
    pub fn next_page(&mut self) -> bool {
        if !self.can_next_page() {
            return false;
        }
        self.page_index += 1;
        true
    }

    /// Go back one page. No-op on the first page.
    pub fn previous_page(&mut self) -> bool {
        if !self.can_previous_page() {
            return false;
        }
        self.page_index -= 1;
        true
    }

    /// Jump to a page, clamped to the valid range.
    pub fn set_page_index(&mut self, index: usize) {
        self.page_index = index.min(self.page_count().saturating_sub(1));
    }

    // -------------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------------

    /// Restore every default and delete the saved view for this key.
    pub async fn reset_view(&mut self) {
        self.config = ViewConfig::defaults_for(&self.columns);
        self.column_filters.clear();
        self.page_index = 0;
        self.recompute();
        self.writer.clear().await;
        info!("reset view '{}'", self.storage_key);
    }

    /// Write any pending view change now.
    pub async fn flush(&mut self) {
        self.writer.flush().await;
    }

    /// Flush pending changes and release the view.
    ///
    /// Dropping a view without closing it discards a pending write.
    pub async fn close(mut self) {
        self.writer.flush().await;
    }

    // -------------------------------------------------------------------------
    // Export
    // -------------------------------------------------------------------------

    /// Whether an export callback was registered.
    pub fn can_export_csv(&self) -> bool {
        self.export_handler.is_some()
    }

    /// Snapshot of the visible columns over every filtered row.
    pub fn export_data(&self) -> ExportData {
        let columns = self.visible_columns();
        ExportData {
            headers: columns.iter().map(|c| c.id.clone()).collect(),
            rows: self
                .rows()
                .into_iter()
                .map(|row| columns.iter().map(|c| row.value(&c.id).to_string()).collect())
                .collect(),
        }
    }

    /// Hand the current export snapshot to the registered callback.
    ///
    /// Returns `false` when no callback is registered.
    pub fn export_csv(&mut self) -> bool {
        let data = self.export_data();
        match self.export_handler.as_mut() {
            Some(handler) => {
                handler(&data);
                true
            }
            None => false,
        }
    }

    // -------------------------------------------------------------------------
    // Internal
    // -------------------------------------------------------------------------

    fn known(&self, id: &str) -> bool {
        let known = self.column(id).is_some();
        if !known {
            debug!("unknown column '{}' ignored", id);
        }
        known
    }

    fn recompute(&mut self) {
        let mut indices = pipeline::filter_rows(
            &self.rows,
            &self.columns,
            &self.config.global_filter,
            &self.column_filters,
        );
        if let Some((column, direction)) = self.config.sort() {
            pipeline::sort_rows(&mut indices, &self.rows, column, direction);
        }
        self.processed = indices;
        self.page_index = self
            .page_index
            .min(pipeline::page_count(self.processed.len(), self.page_size).saturating_sub(1));
    }

    fn changed(&mut self) {
        match self.config.to_json() {
            Ok(payload) => self.writer.schedule(payload),
            Err(e) => warn!("failed to serialize view '{}': {}", self.storage_key, e),
        }
    }
}

impl<T: TableRow> std::fmt::Debug for TableView<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableView")
            .field("storage_key", &self.storage_key)
            .field("config", &self.config)
            .field("column_filters", &self.column_filters)
            .field("rows", &self.rows.len())
            .field("processed", &self.processed.len())
            .field("page_index", &self.page_index)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

async fn load(store: &dyn LocalStore, key: &str) -> Result<Option<ViewConfig>, ViewError> {
    match store.get(key).await? {
        Some(raw) => Ok(Some(ViewConfig::from_json(&raw)?)),
        None => Ok(None),
    }
}
