//! Generic table view controller.
//!
//! A [`TableView`] renders an arbitrary row set as a filterable, sortable,
//! groupable and column-configurable table, and remembers the user's
//! [`ViewConfig`] per column schema in a [`LocalStore`](crate::store::LocalStore).
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use stockroom_lib::store::MemoryStore;
//! use stockroom_lib::table::{render, Column, TableOptions, TableView};
//!
//! let mut view = TableView::open(columns, rows, Arc::new(MemoryStore::new()), TableOptions::default()).await;
//! view.toggle_sort("name");
//! println!("{}", render(&view));
//! view.close().await;
//! ```

mod column;
mod config;
mod options;
mod persist;
pub mod pipeline;
mod render;
mod view;

pub use column::{CellFormatter, Column, active_badge};
pub use config::{ColumnPinning, PinSide, SortDirection, SortEntry, ViewConfig, storage_key};
pub use options::{DEFAULT_NAMESPACE, TableOptions};
pub use pipeline::RowGroup;
pub use render::render;
pub use view::{EMPTY_MESSAGE, ExportHandler, MoveDirection, TableView};
