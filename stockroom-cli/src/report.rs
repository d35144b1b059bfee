//! Read-only reports over the whole dataset.

use std::sync::Arc;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use stockroom_lib::inventory::charts::{self, DailyCount, NamedCount};
use stockroom_lib::inventory::dashboard::{self, AttentionRow, DashboardFilter};
use stockroom_lib::inventory::replenishment::{self, Suggestion};
use stockroom_lib::inventory::{Dataset, date_cell, fefo};
use stockroom_lib::store::LocalStore;
use stockroom_lib::table::{TableOptions, TableView, render};

/// Width of the longest chart bar.
const BAR_WIDTH: usize = 30;

/// Batches of one item, or of every item, in the order to sell them.
pub fn fefo(dataset: &Dataset, item_id: Option<i64>) -> Result<()> {
    let batches = match item_id {
        Some(id) => {
            if dataset.item(id).is_none() {
                bail!("no item with id {}", id);
            }
            let own: Vec<_> = dataset
                .quantities
                .iter()
                .filter(|q| q.item_id == id && q.status)
                .cloned()
                .collect();
            if let Some(next) = fefo::suggest_for_item(dataset, id) {
                println!("sell next: batch {}", next.id);
            }
            own
        }
        None => dataset.quantities.clone(),
    };

    for q in fefo::order(&batches) {
        let item = dataset
            .item(q.item_id)
            .map(|i| i.item_name.as_str())
            .unwrap_or("?");
        let expiry = date_cell(&q.expiry_date.into());
        println!(
            "{:>6}  {:<16} {:<12} {:>6}  {}",
            q.id,
            item,
            q.lot_number.as_deref().unwrap_or("-"),
            q.quantity,
            if expiry.is_empty() { "no expiry" } else { expiry.as_str() }
        );
    }
    Ok(())
}

/// The reorder table.
pub async fn replenish(
    dataset: &Dataset,
    store: Arc<dyn LocalStore>,
    options: TableOptions,
    now: DateTime<Utc>,
) -> Result<()> {
    let rows: Vec<Suggestion> = replenishment::suggest(dataset, now);
    let view = TableView::open(Suggestion::columns(), rows, store, options).await;
    println!("{}", render(&view));
    view.close().await;
    Ok(())
}

/// Every chart series as text bars.
pub fn charts(dataset: &Dataset, now: DateTime<Utc>) {
    daily("Sales over time", &charts::sales_over_time(&dataset.sales));
    daily("Batches over time", &charts::batches_over_time(&dataset.quantities));
    daily("Last 7 days", &charts::last_7_days(&dataset.sales, now));
    named("Top items (30d)", &charts::top_items_30d(dataset, now));
    named("Type mix", &charts::type_mix(dataset));
    named("Low stock by brand", &charts::low_stock_by_brand(dataset));
    named("Returns", &charts::returns_mix(&dataset.returns));
    named("Stock aging", &charts::aging_buckets(&dataset.quantities, now));
}

/// Headline figures and the attention list.
pub async fn dashboard(
    dataset: &Dataset,
    filter: DashboardFilter,
    store: Arc<dyn LocalStore>,
    options: TableOptions,
    now: DateTime<Utc>,
) -> Result<()> {
    let k = dashboard::kpis(dataset, filter, now);
    println!("Items          {}", k.total_items);
    println!("In stock       {}", k.in_stock);
    println!("Brands         {}", k.total_brands);
    println!("Sales today    {}", k.sales_today);
    println!("Low stock      {}", k.low_stock);
    println!("Stockouts      {}", k.stockouts);
    println!("Expiring soon  {}", k.expiring_soon);
    println!("Slow movers    {}", k.slow_movers);
    println!();

    let rows = dashboard::attention_rows(dataset, filter, now);
    let view = TableView::open(AttentionRow::columns(), rows, store, options).await;
    println!("{}", render(&view));
    view.close().await;
    Ok(())
}

fn daily(title: &str, points: &[DailyCount]) {
    let bars: Vec<(&str, usize)> = points.iter().map(|p| (p.date.as_str(), p.count)).collect();
    chart(title, &bars);
}

fn named(title: &str, points: &[NamedCount]) {
    let bars: Vec<(&str, usize)> = points.iter().map(|p| (p.name.as_str(), p.count)).collect();
    chart(title, &bars);
}

fn chart(title: &str, bars: &[(&str, usize)]) {
    println!("{}", title);
    if bars.is_empty() {
        println!("  (no data)");
    }
    let max = bars.iter().map(|(_, n)| *n).max().unwrap_or(0).max(1);
    let label_width = bars.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    for (label, count) in bars {
        let len = count * BAR_WIDTH / max;
        println!(
            "  {:<width$}  {} {}",
            label,
            "#".repeat(len),
            count,
            width = label_width
        );
    }
    println!();
}
