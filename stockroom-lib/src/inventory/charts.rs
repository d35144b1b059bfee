//! Dashboard chart series.
//!
//! Each function reduces collections to the points one chart plots. Series
//! keyed by name keep the order in which names were first seen unless
//! documented otherwise.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use super::replenishment::stock_per_item;
use super::{Dataset, Quantity, Return, Sale};

/// Batches with fewer units than this count as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Longest ranked series a chart shows.
pub const TOP_N: usize = 8;

/// A count on one calendar day (`YYYY-MM-DD`, UTC).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyCount {
    pub date: String,
    pub count: usize,
}

/// A count for one named category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedCount {
    pub name: String,
    pub count: usize,
}

/// Ordered counter that remembers first-seen order.
#[derive(Default)]
struct Tally {
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

impl Tally {
    fn add(&mut self, key: String) {
        match self.counts.get_mut(&key) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(key.clone(), 1);
                self.order.push(key);
            }
        }
    }

    fn into_named(self) -> Vec<NamedCount> {
        let Tally { order, counts } = self;
        order
            .into_iter()
            .map(|name| {
                let count = counts.get(&name).copied().unwrap_or(0);
                NamedCount { name, count }
            })
            .collect()
    }

    fn into_top(self, n: usize) -> Vec<NamedCount> {
        let mut named = self.into_named();
        named.sort_by(|a, b| b.count.cmp(&a.count));
        named.truncate(n);
        named
    }
}

fn day(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Records per day, for records with a timestamp.
pub fn daily_counts(timestamps: impl IntoIterator<Item = Option<DateTime<Utc>>>) -> Vec<DailyCount> {
    let mut tally = Tally::default();
    for at in timestamps.into_iter().flatten() {
        tally.add(day(at));
    }
    tally
        .into_named()
        .into_iter()
        .map(|n| DailyCount {
            date: n.name,
            count: n.count,
        })
        .collect()
}

/// Sales per day.
pub fn sales_over_time(sales: &[Sale]) -> Vec<DailyCount> {
    daily_counts(sales.iter().map(|s| s.created_at))
}

/// Stock batches added per day.
pub fn batches_over_time(quantities: &[Quantity]) -> Vec<DailyCount> {
    daily_counts(quantities.iter().map(|q| q.created_at))
}

/// Sales on each of the last seven days, oldest first, zero-filled.
pub fn last_7_days(sales: &[Sale], now: DateTime<Utc>) -> Vec<DailyCount> {
    let mut series: Vec<DailyCount> = (0..7)
        .rev()
        .map(|n| DailyCount {
            date: day(now - Duration::days(n)),
            count: 0,
        })
        .collect();
    for at in sales.iter().filter_map(|s| s.created_at) {
        let date = day(at);
        if let Some(point) = series.iter_mut().find(|p| p.date == date) {
            point.count += 1;
        }
    }
    series
}

/// Best selling items over the last 30 days, most sales first.
pub fn top_items_30d(dataset: &Dataset, now: DateTime<Utc>) -> Vec<NamedCount> {
    let cutoff = now - Duration::days(30);
    let mut tally = Tally::default();
    for sale in &dataset.sales {
        if !sale.created_at.is_some_and(|at| at >= cutoff) {
            continue;
        }
        let item_id = dataset
            .quantities
            .iter()
            .find(|q| q.id == sale.item_quantity_id)
            .map(|q| q.item_id);
        let name = match item_id {
            Some(id) => dataset
                .item(id)
                .map(|i| i.item_name.clone())
                .unwrap_or_else(|| id.to_string()),
            None => "Unknown".to_string(),
        };
        tally.add(name);
    }
    tally.into_top(TOP_N)
}

/// Items per item type. Items whose brand is unknown are skipped.
pub fn type_mix(dataset: &Dataset) -> Vec<NamedCount> {
    let mut tally = Tally::default();
    for item in &dataset.items {
        let Some(brand) = dataset.brand(item.item_brand_id) else {
            continue;
        };
        let name = dataset
            .types
            .iter()
            .find(|t| t.id == brand.item_type_id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        tally.add(name);
    }
    tally.into_named()
}

/// Low-stock items per brand, most first.
pub fn low_stock_by_brand(dataset: &Dataset) -> Vec<NamedCount> {
    let stock = stock_per_item(dataset);
    let mut tally = Tally::default();
    for item in &dataset.items {
        if stock.get(&item.id).copied().unwrap_or(0) < LOW_STOCK_THRESHOLD {
            let name = dataset
                .brand(item.item_brand_id)
                .map(|b| b.brand_name.clone())
                .unwrap_or_else(|| format!("#{}", item.item_brand_id));
            tally.add(name);
        }
    }
    tally.into_top(TOP_N)
}

/// Returns per status.
pub fn returns_mix(returns: &[Return]) -> Vec<NamedCount> {
    let mut tally = Tally::default();
    for r in returns {
        tally.add(r.status.to_string());
    }
    tally.into_named()
}

/// Age buckets of stock batches, by days since they were added.
pub const AGING_BUCKETS: [(&str, i64, i64); 4] = [
    ("<30d", 0, 29),
    ("30-60d", 30, 60),
    ("61-90d", 61, 90),
    (">90d", 91, i64::MAX),
];

/// Batches per age bucket. Batches without a creation date are skipped.
pub fn aging_buckets(quantities: &[Quantity], now: DateTime<Utc>) -> Vec<NamedCount> {
    let mut buckets: Vec<NamedCount> = AGING_BUCKETS
        .iter()
        .map(|(name, _, _)| NamedCount {
            name: name.to_string(),
            count: 0,
        })
        .collect();
    for created in quantities.iter().filter_map(|q| q.created_at) {
        let days = (now - created).num_days();
        if let Some(idx) = AGING_BUCKETS
            .iter()
            .position(|(_, min, max)| days >= *min && days <= *max)
        {
            buckets[idx].count += 1;
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::demo_dataset;

    #[test]
    fn test_last_7_days_zero_filled() {
        let now = Utc::now();
        let data = demo_dataset(now);
        let series = last_7_days(&data.sales, now);
        assert_eq!(series.len(), 7);
        assert_eq!(series[6].date, day(now));
        let counts: Vec<usize> = series.iter().map(|p| p.count).collect();
        assert_eq!(counts, vec![0, 0, 0, 0, 1, 1, 1]);
    }

    #[test]
    fn test_daily_counts_skip_missing() {
        let at = "2024-05-01T10:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let series = daily_counts([Some(at), None, Some(at + Duration::hours(1))]);
        assert_eq!(
            series,
            vec![DailyCount {
                date: "2024-05-01".into(),
                count: 2
            }]
        );
    }

    #[test]
    fn test_top_items() {
        let now = Utc::now();
        let mut data = demo_dataset(now);
        let mut repeat = data.sales[2].clone();
        repeat.id = 4;
        data.sales.push(repeat);
        let top = top_items_30d(&data, now);
        assert_eq!(top[0].name, "AIRism Tee");
        assert_eq!(top[0].count, 2);
        assert_eq!(top.len(), 3);
    }

    #[test]
    fn test_type_mix() {
        let data = demo_dataset(Utc::now());
        let mix = type_mix(&data);
        assert_eq!(mix[0].name, "Electronics");
        assert_eq!(mix[0].count, 2);
        assert_eq!(mix[1].name, "Apparel");
        assert_eq!(mix[1].count, 1);
    }

    #[test]
    fn test_low_stock_by_brand() {
        let now = Utc::now();
        let mut data = demo_dataset(now);
        assert!(low_stock_by_brand(&data).is_empty());
        data.quantities[1].quantity = 3;
        data.items[1].item_brand_id = 42;
        let low = low_stock_by_brand(&data);
        assert_eq!(low, vec![NamedCount { name: "#42".into(), count: 1 }]);
    }

    #[test]
    fn test_returns_mix() {
        let data = demo_dataset(Utc::now());
        let mix = returns_mix(&data.returns);
        assert_eq!(mix[0].name, "Requested");
        assert_eq!(mix[1].name, "Approved");
    }

    #[test]
    fn test_aging_buckets() {
        let now = Utc::now();
        let mut data = demo_dataset(now);
        data.quantities[0].created_at = Some(now - Duration::days(45));
        data.quantities[1].created_at = Some(now - Duration::days(200));
        let counts: Vec<usize> = aging_buckets(&data.quantities, now)
            .iter()
            .map(|b| b.count)
            .collect();
        assert_eq!(counts, vec![1, 1, 0, 1]);
    }
}
