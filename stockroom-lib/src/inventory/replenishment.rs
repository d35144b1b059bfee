//! Reorder suggestions.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use super::Dataset;
use crate::model::{TableRow, Value};
use crate::table::Column;

/// Lead time used when no supplier states one.
pub const DEFAULT_LEAD_TIME_DAYS: u32 = 7;
/// Units kept on hand on top of expected demand.
pub const SAFETY_STOCK: i64 = 10;

/// How many units of one item to reorder.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub item_id: i64,
    pub item_name: String,
    /// Units across all batches.
    pub current: i64,
    /// Sales in the last 30 days, used as the 30 day forecast.
    pub forecast_30d: i64,
    pub lead_time_days: u32,
    pub safety: i64,
    pub suggested: i64,
}

impl Suggestion {
    pub fn columns() -> Vec<Column> {
        vec![
            Column::new("itemName", "Item"),
            Column::new("current", "Current"),
            Column::new("forecast30d", "Forecast (30d)"),
            Column::new("leadTimeDays", "Lead Time (d)"),
            Column::new("safety", "Safety"),
            Column::new("suggested", "Suggested"),
        ]
    }
}

impl TableRow for Suggestion {
    fn value(&self, column_id: &str) -> Value {
        match column_id {
            "itemId" => self.item_id.into(),
            "itemName" => self.item_name.as_str().into(),
            "current" => self.current.into(),
            "forecast30d" => self.forecast_30d.into(),
            "leadTimeDays" => self.lead_time_days.into(),
            "safety" => self.safety.into(),
            "suggested" => self.suggested.into(),
            _ => Value::Null,
        }
    }
}

/// Units on hand per item, summed over every batch.
pub fn stock_per_item(dataset: &Dataset) -> HashMap<i64, i64> {
    let mut stock = HashMap::new();
    for q in &dataset.quantities {
        *stock.entry(q.item_id).or_insert(0) += q.quantity;
    }
    stock
}

/// Sales per item since `since`, attributed through the sold batch.
pub fn sales_per_item(dataset: &Dataset, since: DateTime<Utc>) -> HashMap<i64, i64> {
    let batch_item: HashMap<i64, i64> = dataset
        .quantities
        .iter()
        .map(|q| (q.id, q.item_id))
        .collect();
    let mut sales = HashMap::new();
    for sale in &dataset.sales {
        let recent = sale.created_at.is_some_and(|at| at >= since);
        if let (true, Some(item_id)) = (recent, batch_item.get(&sale.item_quantity_id)) {
            *sales.entry(*item_id).or_insert(0) += 1;
        }
    }
    sales
}

/// Suggest a reorder quantity for every item.
///
/// `suggested = max(0, ceil(forecast * lead / 30 + safety - current))`,
/// where the forecast is the 30 day sale count and the lead time is the
/// first supplier's, or [`DEFAULT_LEAD_TIME_DAYS`].
pub fn suggest(dataset: &Dataset, now: DateTime<Utc>) -> Vec<Suggestion> {
    let stock = stock_per_item(dataset);
    let sales = sales_per_item(dataset, now - Duration::days(30));
    let lead_time_days = dataset
        .suppliers
        .first()
        .and_then(|s| s.lead_time_days)
        .filter(|days| *days > 0)
        .unwrap_or(DEFAULT_LEAD_TIME_DAYS);

    dataset
        .items
        .iter()
        .map(|item| {
            let current = stock.get(&item.id).copied().unwrap_or(0);
            let forecast_30d = sales.get(&item.id).copied().unwrap_or(0);
            let need = forecast_30d as f64 * (f64::from(lead_time_days) / 30.0)
                + SAFETY_STOCK as f64
                - current as f64;
            Suggestion {
                item_id: item.id,
                item_name: item.item_name.clone(),
                current,
                forecast_30d,
                lead_time_days,
                safety: SAFETY_STOCK,
                suggested: (need.ceil() as i64).max(0),
            }
        })
        .collect()
}
