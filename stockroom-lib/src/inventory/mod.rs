//! Inventory domain: entities, forms, demo data and the derived views the
//! dashboard shows.

pub mod charts;
pub mod dashboard;
mod dataset;
mod entities;
pub mod fefo;
mod forms;
mod kind;
pub mod replenishment;
mod source;

pub use dataset::*;
pub use entities::*;
pub use forms::*;
pub use kind::*;
pub use source::*;

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::table::{DEFAULT_NAMESPACE, storage_key};

    #[test]
    fn test_each_collection_has_its_own_saved_view() {
        let keys: HashSet<String> = [
            storage_key(DEFAULT_NAMESPACE, &ItemType::columns()),
            storage_key(DEFAULT_NAMESPACE, &Brand::columns()),
            storage_key(DEFAULT_NAMESPACE, &Item::columns()),
            storage_key(DEFAULT_NAMESPACE, &Quantity::columns()),
            storage_key(DEFAULT_NAMESPACE, &Sale::columns()),
            storage_key(DEFAULT_NAMESPACE, &Supplier::columns()),
            storage_key(DEFAULT_NAMESPACE, &PurchaseOrder::columns()),
            storage_key(DEFAULT_NAMESPACE, &Warehouse::columns()),
            storage_key(DEFAULT_NAMESPACE, &Bin::columns()),
            storage_key(DEFAULT_NAMESPACE, &Transfer::columns()),
            storage_key(DEFAULT_NAMESPACE, &Return::columns()),
            storage_key(DEFAULT_NAMESPACE, &CycleCount::columns()),
            storage_key(DEFAULT_NAMESPACE, &Adjustment::columns()),
        ]
        .into_iter()
        .collect();
        assert_eq!(keys.len(), EntityKind::ALL.len());
    }
}
