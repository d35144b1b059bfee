//! Integration tests for table view persistence.
//!
//! Each test opens a view, changes it, and reopens a fresh view over the
//! same column set to check what was remembered.

use std::sync::Arc;
use std::time::Duration;

use stockroom_lib::model::{Record, TableRow};
use stockroom_lib::store::{LocalStore, MemoryStore, SqliteStore};
use stockroom_lib::table::{
    Column, EMPTY_MESSAGE, MoveDirection, PinSide, SortDirection, TableOptions, TableView,
    ViewConfig, render,
};

fn columns() -> Vec<Column> {
    vec![
        Column::new("id", "ID"),
        Column::new("name", "Name"),
        Column::new("status", "Status"),
    ]
}

fn rows() -> Vec<Record> {
    vec![
        Record::new().set("id", 1i64).set("name", "Widget").set("status", true),
        Record::new().set("id", 2i64).set("name", "Gadget").set("status", false),
    ]
}

async fn open(store: &Arc<dyn LocalStore>, rows: Vec<Record>) -> TableView<Record> {
    TableView::open(columns(), rows, Arc::clone(store), TableOptions::default()).await
}

fn ids(view: &TableView<Record>) -> Vec<String> {
    view.rows()
        .iter()
        .map(|r| r.value("id").to_string())
        .collect()
}

#[tokio::test]
async fn test_round_trip() {
    let store: Arc<dyn LocalStore> = Arc::new(MemoryStore::new());

    let mut view = open(&store, rows()).await;
    view.toggle_sort("name");
    view.toggle_sort("name");
    view.set_global_filter("get");
    view.set_column_visibility("status", false);
    view.move_column("name", MoveDirection::Earlier);
    view.pin_column("id", Some(PinSide::Right));
    view.set_group_by(Some("status"));
    let saved = view.config().clone();
    view.close().await;

    let reopened = open(&store, rows()).await;
    assert_eq!(reopened.config(), &saved);
    assert_eq!(reopened.sort(), Some(("name", SortDirection::Descending)));
    assert_eq!(ids(&reopened), vec!["1", "2"]);
}

#[tokio::test]
async fn test_reset_then_reload_gives_defaults() {
    let store: Arc<dyn LocalStore> = Arc::new(MemoryStore::new());

    let mut view = open(&store, rows()).await;
    view.toggle_sort("id");
    view.set_global_filter("widg");
    view.set_column_visibility("name", false);
    view.flush().await;

    view.reset_view().await;
    view.close().await;

    let reopened = open(&store, rows()).await;
    assert_eq!(reopened.config(), &ViewConfig::defaults_for(&columns()));
    assert_eq!(reopened.visible_columns().len(), 3);
    assert_eq!(ids(&reopened), vec!["1", "2"]);
    assert!(
        store
            .keys_with_prefix("datatable:view:")
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_global_filter_scenario() {
    let store: Arc<dyn LocalStore> = Arc::new(MemoryStore::new());
    let mut view = open(&store, rows()).await;

    view.set_global_filter("widg");
    assert_eq!(ids(&view), vec!["1"]);

    view.set_global_filter("zzz");
    assert!(view.is_empty());
    assert!(render(&view).contains(EMPTY_MESSAGE));

    // status cells are booleans and stay out of global search
    view.set_global_filter("true");
    assert!(view.is_empty());
}

#[tokio::test]
async fn test_pagination_scenario() {
    let store: Arc<dyn LocalStore> = Arc::new(MemoryStore::new());
    let many: Vec<Record> = (1..=22i64)
        .map(|i| Record::new().set("id", i).set("name", format!("Part {}", i)))
        .collect();
    let mut view = open(&store, many).await;

    assert_eq!(view.page_size(), 10);
    assert_eq!(view.page_count(), 3);
    assert!(view.next_page());
    assert!(view.next_page());
    assert_eq!(view.page_index(), 2);
    assert_eq!(view.page_rows().len(), 2);

    assert!(!view.next_page());
    assert_eq!(view.page_index(), 2);

    assert!(view.previous_page());
    assert_eq!(view.page_rows().len(), 10);
    assert!(render(&view).ends_with("Page 2 of 3"));
}

#[tokio::test]
async fn test_grouping_scenario() {
    let store: Arc<dyn LocalStore> = Arc::new(MemoryStore::new());
    let rows = vec![
        Record::new().set("id", 1i64).set("status", "A"),
        Record::new().set("id", 2i64).set("status", "B"),
        Record::new().set("id", 3i64).set("status", "A"),
    ];
    let mut view = open(&store, rows).await;
    view.set_group_by(Some("status"));

    let groups = view.groups().unwrap();
    let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["A", "B"]);
    assert_eq!(groups[0].len(), 2);
    assert_eq!(groups[1].len(), 1);
}

#[tokio::test]
async fn test_unknown_saved_columns_are_dropped() {
    let store: Arc<dyn LocalStore> = Arc::new(MemoryStore::new());
    store
        .set(
            "datatable:view:id|name|status",
            r#"{"sorting":[{"id":"price","desc":false}],"columnOrder":["status","price"],"groupBy":"price","globalFilter":7}"#,
        )
        .await
        .unwrap();

    let view = open(&store, rows()).await;
    assert_eq!(view.sort(), None);
    assert_eq!(view.config().column_order, vec!["status", "id", "name"]);
    assert!(!view.is_grouped());
    assert_eq!(view.config().global_filter, "");
}

#[tokio::test]
async fn test_write_failures_keep_the_view() {
    let store: Arc<dyn LocalStore> = Arc::new(MemoryStore::with_quota(8));
    let mut view = open(&store, rows()).await;

    view.toggle_sort("name");
    view.flush().await;

    assert_eq!(view.sort(), Some(("name", SortDirection::Ascending)));
    assert_eq!(store.get(view.storage_key()).await.unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_view_leaves_no_write() {
    let store: Arc<dyn LocalStore> = Arc::new(MemoryStore::new());
    {
        let mut view = open(&store, rows()).await;
        view.toggle_sort("name");
    }
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(
        store
            .keys_with_prefix("datatable:view:")
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_sqlite_store_survives_reopen() {
    let path = std::env::temp_dir().join(format!("stockroom-views-{}.db", std::process::id()));
    let _ = std::fs::remove_file(&path);

    {
        let store: Arc<dyn LocalStore> = Arc::new(SqliteStore::open(&path).await.unwrap());
        let mut view = open(&store, rows()).await;
        view.toggle_sort("id");
        view.toggle_sort("id");
        view.close().await;
    }

    let store: Arc<dyn LocalStore> = Arc::new(SqliteStore::open(&path).await.unwrap());
    let view = open(&store, rows()).await;
    assert_eq!(view.sort(), Some(("id", SortDirection::Descending)));
    assert_eq!(ids(&view), vec!["2", "1"]);

    drop(view);
    drop(store);
    let _ = std::fs::remove_file(&path);
}
