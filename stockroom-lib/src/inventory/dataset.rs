//! In-memory collections and the built-in demo data.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use super::entities::*;

/// Every inventory collection, as loaded from a data source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub types: Vec<ItemType>,
    pub brands: Vec<Brand>,
    pub items: Vec<Item>,
    pub quantities: Vec<Quantity>,
    pub sales: Vec<Sale>,
    pub suppliers: Vec<Supplier>,
    pub purchase_orders: Vec<PurchaseOrder>,
    pub warehouses: Vec<Warehouse>,
    pub bins: Vec<Bin>,
    pub transfers: Vec<Transfer>,
    pub returns: Vec<Return>,
    pub cycle_counts: Vec<CycleCount>,
    pub adjustments: Vec<Adjustment>,
}

impl Dataset {
    /// Item by id.
    pub fn item(&self, id: i64) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Brand by id.
    pub fn brand(&self, id: i64) -> Option<&Brand> {
        self.brands.iter().find(|b| b.id == id)
    }

    /// Active brands of one item type.
    pub fn active_brands_of_type(&self, item_type_id: i64) -> Vec<&Brand> {
        self.brands
            .iter()
            .filter(|b| b.item_type_id == item_type_id && b.status)
            .collect()
    }

    /// Active items of one brand.
    pub fn active_items_of_brand(&self, brand_id: i64) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|i| i.item_brand_id == brand_id && i.status)
            .collect()
    }

    /// Active stock batches of one item.
    pub fn active_quantities_of_item(&self, item_id: i64) -> Vec<&Quantity> {
        self.quantities
            .iter()
            .filter(|q| q.item_id == item_id && q.status)
            .collect()
    }
}

/// The demo data shown when no backend is available.
///
/// Timestamps are relative to `now` so the dashboards always have recent
/// activity to show.
pub fn demo_dataset(now: DateTime<Utc>) -> Dataset {
    let days_ago = |n: i64| Some(now - Duration::days(n));

    Dataset {
        types: vec![
            ItemType { id: 1, name: "Electronics".into(), status: true, created_at: days_ago(12) },
            ItemType { id: 2, name: "Apparel".into(), status: true, created_at: days_ago(10) },
            ItemType { id: 3, name: "Home".into(), status: false, created_at: days_ago(8) },
        ],
        brands: vec![
            Brand { id: 1, brand_name: "Apple".into(), item_type_id: 1, status: true, created_at: days_ago(9) },
            Brand { id: 2, brand_name: "Samsung".into(), item_type_id: 1, status: true, created_at: days_ago(7) },
            Brand { id: 3, brand_name: "Uniqlo".into(), item_type_id: 2, status: true, created_at: days_ago(6) },
        ],
        items: vec![
            Item { id: 1, item_name: "iPhone 15".into(), item_brand_id: 1, status: true, created_at: days_ago(6) },
            Item { id: 2, item_name: "Galaxy S24".into(), item_brand_id: 2, status: true, created_at: days_ago(5) },
            Item { id: 3, item_name: "AIRism Tee".into(), item_brand_id: 3, status: true, created_at: days_ago(4) },
        ],
        quantities: vec![
            batch(1, 1, 1001, 50, 800, days_ago(3), "L-IPH-001", days_ago(-120)),
            batch(2, 2, 1002, 40, 700, days_ago(2), "L-GAL-002", days_ago(60)),
            batch(3, 3, 1003, 120, 10, days_ago(1), "L-AIR-003", days_ago(15)),
        ],
        sales: vec![
            sale(1, 1, 1001, 999, days_ago(2)),
            sale(2, 2, 1002, 899, days_ago(1)),
            sale(3, 3, 1003, 19, days_ago(0)),
        ],
        suppliers: vec![
            Supplier {
                id: 1,
                name: "Acme Supply Co.".into(),
                email: Some("acme@example.com".into()),
                phone: Some("+1-555-0100".into()),
                lead_time_days: Some(7),
                terms: Some("Net 30".into()),
                rating: Some(4.5),
                status: true,
                created_at: days_ago(14),
            },
            Supplier {
                id: 2,
                name: "Global Traders".into(),
                email: Some("global@example.com".into()),
                phone: Some("+1-555-0110".into()),
                lead_time_days: Some(10),
                terms: Some("Net 15".into()),
                rating: Some(4.2),
                status: true,
                created_at: days_ago(9),
            },
        ],
        purchase_orders: vec![
            PurchaseOrder {
                id: 10001,
                supplier_id: 1,
                status: PurchaseOrderStatus::Approved,
                expected_date: days_ago(-3),
                notes: Some("Priority".into()),
                created_at: days_ago(5),
            },
            PurchaseOrder {
                id: 10002,
                supplier_id: 2,
                status: PurchaseOrderStatus::Draft,
                expected_date: days_ago(2),
                notes: Some("Standard".into()),
                created_at: days_ago(1),
            },
        ],
        warehouses: vec![
            Warehouse { id: 1, name: "Main DC".into(), code: "DC1".into(), status: true, created_at: days_ago(20) },
            Warehouse { id: 2, name: "City Hub".into(), code: "HUB1".into(), status: true, created_at: days_ago(15) },
        ],
        bins: vec![
            Bin { id: 1, warehouse_id: 1, code: "A-01".into(), zone: Some("A".into()), status: true, created_at: days_ago(12) },
            Bin { id: 2, warehouse_id: 1, code: "A-02".into(), zone: Some("A".into()), status: true, created_at: days_ago(11) },
            Bin { id: 3, warehouse_id: 2, code: "Z-01".into(), zone: Some("Z".into()), status: true, created_at: days_ago(10) },
        ],
        transfers: vec![Transfer {
            id: 5001,
            from_warehouse_id: 1,
            to_warehouse_id: 2,
            from_bin_id: Some(1),
            to_bin_id: Some(3),
            item_id: Some(1),
            quantity: 5,
            notes: Some("Rebalance".into()),
            created_at: days_ago(1),
        }],
        returns: vec![
            Return {
                id: 9001,
                kind: ReturnKind::Customer,
                item_id: 1,
                quantity: 1,
                reason: "Damaged on arrival".into(),
                status: ReturnStatus::Requested,
                notes: Some("Box dented".into()),
                created_at: days_ago(0),
            },
            Return {
                id: 9002,
                kind: ReturnKind::Supplier,
                item_id: 2,
                quantity: 2,
                reason: "Over-shipped".into(),
                status: ReturnStatus::Approved,
                notes: Some("Return to sender".into()),
                created_at: days_ago(3),
            },
        ],
        cycle_counts: vec![CycleCount {
            id: 7001,
            warehouse_id: Some(1),
            bin_id: None,
            scheduled_date: days_ago(-1),
            status: CycleCountStatus::Planned,
            variance: Some(0),
            created_at: days_ago(2),
        }],
        adjustments: vec![Adjustment {
            id: 8001,
            item_id: 1,
            quantity: -1,
            reason: "Damage".into(),
            approved: true,
            created_at: days_ago(0),
        }],
    }
}

#[allow(clippy::too_many_arguments)]
fn batch(
    id: i64,
    item_id: i64,
    inventory_id: i64,
    quantity: i64,
    price: i64,
    created_at: Option<DateTime<Utc>>,
    lot: &str,
    expiry: Option<DateTime<Utc>>,
) -> Quantity {
    Quantity {
        id,
        item_id,
        inventory_id,
        quantity,
        purchase_price: Decimal::from(price),
        status: true,
        created_at,
        lot_number: Some(lot.to_string()),
        expiry_date: expiry,
        serials: Vec::new(),
    }
}

fn sale(
    id: i64,
    item_quantity_id: i64,
    inventory_id: i64,
    price: i64,
    created_at: Option<DateTime<Utc>>,
) -> Sale {
    Sale {
        id,
        item_quantity_id,
        inventory_id,
        sale_price: Decimal::from(price),
        status: true,
        created_at,
    }
}
