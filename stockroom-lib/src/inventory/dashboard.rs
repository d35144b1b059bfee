//! Dashboard headline figures and the needs-attention table.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};

use super::charts::LOW_STOCK_THRESHOLD;
use super::replenishment::sales_per_item;
use super::{Dataset, Item};
use crate::model::{TableRow, Value};
use crate::table::Column;

/// Batches expiring within this many days count as expiring soon.
pub const EXPIRING_SOON_DAYS: i64 = 30;

/// Narrows the dashboard to one item type and/or brand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardFilter {
    pub type_id: Option<i64>,
    pub brand_id: Option<i64>,
}

impl DashboardFilter {
    fn allows(&self, dataset: &Dataset, item: &Item) -> bool {
        if let Some(type_id) = self.type_id {
            let matches = dataset
                .brand(item.item_brand_id)
                .is_some_and(|b| b.item_type_id == type_id);
            if !matches {
                return false;
            }
        }
        self.brand_id.is_none_or(|brand_id| item.item_brand_id == brand_id)
    }

    fn allows_item_id(&self, dataset: &Dataset, item_id: i64) -> bool {
        dataset
            .item(item_id)
            .is_some_and(|item| self.allows(dataset, item))
    }
}

/// Headline figures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Kpis {
    pub total_items: usize,
    pub in_stock: i64,
    pub total_brands: usize,
    pub sales_today: usize,
    /// Stocked items below [`LOW_STOCK_THRESHOLD`] units.
    pub low_stock: usize,
    pub stockouts: usize,
    /// Batches expired or expiring within [`EXPIRING_SOON_DAYS`].
    pub expiring_soon: usize,
    /// Items without a sale in the last 30 days.
    pub slow_movers: usize,
}

/// Compute the headline figures.
pub fn kpis(dataset: &Dataset, filter: DashboardFilter, now: DateTime<Utc>) -> Kpis {
    let allowed: HashSet<i64> = dataset
        .items
        .iter()
        .filter(|item| filter.allows(dataset, item))
        .map(|item| item.id)
        .collect();

    let mut per_item: HashMap<i64, i64> = HashMap::new();
    for q in dataset.quantities.iter().filter(|q| allowed.contains(&q.item_id)) {
        *per_item.entry(q.item_id).or_insert(0) += q.quantity;
    }

    let soon = now + Duration::days(EXPIRING_SOON_DAYS);
    let recent_sales = sales_per_item(dataset, now - Duration::days(30));
    let today = now.date_naive();

    Kpis {
        total_items: allowed.len(),
        in_stock: per_item.values().sum(),
        total_brands: dataset.brands.len(),
        sales_today: dataset
            .sales
            .iter()
            .filter(|s| s.created_at.is_some_and(|at| at.date_naive() == today))
            .count(),
        low_stock: per_item
            .values()
            .filter(|qty| **qty < LOW_STOCK_THRESHOLD)
            .count(),
        stockouts: per_item.values().filter(|qty| **qty == 0).count(),
        expiring_soon: dataset
            .quantities
            .iter()
            .filter(|q| allowed.contains(&q.item_id))
            .filter(|q| q.expiry_date.is_some_and(|at| at <= soon))
            .count(),
        slow_movers: allowed
            .iter()
            .filter(|id| !recent_sales.contains_key(id))
            .count(),
    }
}

/// One item that is low on stock or about to expire.
#[derive(Debug, Clone, PartialEq)]
pub struct AttentionRow {
    pub item_id: i64,
    pub name: String,
    pub qty: i64,
    pub earliest_expiry: Option<DateTime<Utc>>,
}

impl AttentionRow {
    pub fn columns() -> Vec<Column> {
        vec![
            Column::new("itemId", "Item ID"),
            Column::new("name", "Name"),
            Column::new("qty", "Qty"),
            Column::new("earliestExpiry", "Earliest Expiry").cell(super::date_cell),
        ]
    }
}

impl TableRow for AttentionRow {
    fn value(&self, column_id: &str) -> Value {
        match column_id {
            "itemId" => self.item_id.into(),
            "name" => self.name.as_str().into(),
            "qty" => self.qty.into(),
            "earliestExpiry" => self.earliest_expiry.into(),
            _ => Value::Null,
        }
    }
}

/// Items needing attention, soonest expiry first; items with no expiry
/// date come last.
pub fn attention_rows(
    dataset: &Dataset,
    filter: DashboardFilter,
    now: DateTime<Utc>,
) -> Vec<AttentionRow> {
    let mut order: Vec<i64> = Vec::new();
    let mut by_item: HashMap<i64, AttentionRow> = HashMap::new();
    for q in &dataset.quantities {
        if !filter.allows_item_id(dataset, q.item_id) {
            continue;
        }
        let row = by_item.entry(q.item_id).or_insert_with(|| {
            order.push(q.item_id);
            AttentionRow {
                item_id: q.item_id,
                name: dataset
                    .item(q.item_id)
                    .map(|i| i.item_name.clone())
                    .unwrap_or_else(|| format!("Item {}", q.item_id)),
                qty: 0,
                earliest_expiry: None,
            }
        });
        row.qty += q.quantity;
        if let Some(expiry) = q.expiry_date {
            row.earliest_expiry = Some(row.earliest_expiry.map_or(expiry, |e| e.min(expiry)));
        }
    }

    let soon = now + Duration::days(EXPIRING_SOON_DAYS);
    let mut rows: Vec<AttentionRow> = order
        .into_iter()
        .filter_map(|id| by_item.remove(&id))
        .filter(|r| r.qty < LOW_STOCK_THRESHOLD || r.earliest_expiry.is_some_and(|at| at <= soon))
        .collect();
    rows.sort_by_key(|r| (r.earliest_expiry.is_none(), r.earliest_expiry));
    rows
}
