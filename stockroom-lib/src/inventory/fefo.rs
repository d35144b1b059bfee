//! First-expired-first-out batch selection.

use super::{Dataset, Quantity};

/// Batches in FEFO order: nearest expiry first, batches without an expiry
/// date last. Ties keep their input order.
pub fn order(quantities: &[Quantity]) -> Vec<&Quantity> {
    let mut ordered: Vec<&Quantity> = quantities.iter().collect();
    ordered.sort_by_key(|q| (q.expiry_date.is_none(), q.expiry_date));
    ordered
}

/// The batch to sell from next, if any.
pub fn suggest(quantities: &[Quantity]) -> Option<&Quantity> {
    order(quantities).into_iter().next()
}

/// The batch to sell from next among an item's active batches.
pub fn suggest_for_item(dataset: &Dataset, item_id: i64) -> Option<&Quantity> {
    dataset
        .active_quantities_of_item(item_id)
        .into_iter()
        .min_by_key(|q| (q.expiry_date.is_none(), q.expiry_date))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::inventory::demo_dataset;

    #[test]
    fn test_nearest_expiry_first() {
        let now = Utc::now();
        let mut data = demo_dataset(now);
        data.quantities[1].expiry_date = None;

        let ids: Vec<i64> = order(&data.quantities).iter().map(|q| q.id).collect();
        // batch 3 expired 15 days ago, batch 1 expires in 120 days
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(suggest(&data.quantities).map(|q| q.id), Some(3));
    }

    #[test]
    fn test_empty() {
        assert!(suggest(&[]).is_none());
    }

    #[test]
    fn test_for_item_skips_inactive() {
        let now = Utc::now();
        let mut data = demo_dataset(now);
        let mut older = data.quantities[0].clone();
        older.id = 4;
        older.expiry_date = Some(now + Duration::days(5));
        older.status = false;
        data.quantities.push(older.clone());
        assert_eq!(suggest_for_item(&data, 1).map(|q| q.id), Some(1));

        older.id = 5;
        older.status = true;
        data.quantities.push(older);
        assert_eq!(suggest_for_item(&data, 1).map(|q| q.id), Some(5));
    }
}
