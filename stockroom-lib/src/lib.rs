//! Stockroom inventory admin library
//!
//! The core is a generic table view controller ([`table::TableView`]):
//! filtering, sorting, grouping, column visibility/order/pinning and
//! pagination over any row type, with the view remembered per column schema
//! in a [`store::LocalStore`]. Around it sit the inventory domain, an
//! application settings context and a CSV export adapter.

pub mod error;
pub mod export;
pub mod inventory;
pub mod model;
pub mod settings;
pub mod store;
pub mod table;
