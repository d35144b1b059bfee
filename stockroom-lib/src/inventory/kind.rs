//! Entity collections.

use std::fmt;
use std::str::FromStr;

/// One of the inventory collections a table can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    ItemTypes,
    Brands,
    Items,
    Inventory,
    Sales,
    Suppliers,
    PurchaseOrders,
    Warehouses,
    Bins,
    Transfers,
    Returns,
    CycleCounts,
    Adjustments,
}

impl EntityKind {
    /// Every collection, in sidebar order.
    pub const ALL: [EntityKind; 13] = [
        EntityKind::ItemTypes,
        EntityKind::Brands,
        EntityKind::Items,
        EntityKind::Inventory,
        EntityKind::Sales,
        EntityKind::Suppliers,
        EntityKind::PurchaseOrders,
        EntityKind::Warehouses,
        EntityKind::Bins,
        EntityKind::Transfers,
        EntityKind::Returns,
        EntityKind::CycleCounts,
        EntityKind::Adjustments,
    ];

    /// Collection name, as used on the command line and in data files.
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::ItemTypes => "types",
            EntityKind::Brands => "brands",
            EntityKind::Items => "items",
            EntityKind::Inventory => "inventory",
            EntityKind::Sales => "sales",
            EntityKind::Suppliers => "suppliers",
            EntityKind::PurchaseOrders => "purchase-orders",
            EntityKind::Warehouses => "warehouses",
            EntityKind::Bins => "bins",
            EntityKind::Transfers => "transfers",
            EntityKind::Returns => "returns",
            EntityKind::CycleCounts => "cycle-counts",
            EntityKind::Adjustments => "adjustments",
        }
    }

    /// Page title.
    pub fn title(self) -> &'static str {
        match self {
            EntityKind::ItemTypes => "Item Types",
            EntityKind::Brands => "Brands",
            EntityKind::Items => "Items",
            EntityKind::Inventory => "Inventory",
            EntityKind::Sales => "Sales",
            EntityKind::Suppliers => "Suppliers",
            EntityKind::PurchaseOrders => "Purchase Orders",
            EntityKind::Warehouses => "Warehouses",
            EntityKind::Bins => "Bins",
            EntityKind::Transfers => "Transfers",
            EntityKind::Returns => "Returns",
            EntityKind::CycleCounts => "Cycle Counts",
            EntityKind::Adjustments => "Adjustments",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown collection '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.name().parse::<EntityKind>(), Ok(kind));
        }
        assert!("widgets".parse::<EntityKind>().is_err());
    }
}
