//! Where inventory collections come from.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use serde::Serialize;

use super::{Dataset, EntityKind, Tabular, demo_dataset};
use crate::error::SourceError;

/// A provider of raw inventory collections.
///
/// A collection is returned as the JSON array the backend would send.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch one collection.
    async fn fetch(&self, kind: EntityKind) -> Result<serde_json::Value, SourceError>;
}

/// Fetch one collection and decode it into entities.
pub async fn fetch_as<T: Tabular>(source: &dyn DataSource) -> Result<Vec<T>, SourceError> {
    let raw = source.fetch(T::KIND).await?;
    serde_json::from_value(raw).map_err(|source| SourceError::Decode {
        entity: T::KIND.name(),
        source,
    })
}

/// Fetch and decode every collection.
pub async fn load_dataset(source: &dyn DataSource) -> Result<Dataset, SourceError> {
    Ok(Dataset {
        types: fetch_as(source).await?,
        brands: fetch_as(source).await?,
        items: fetch_as(source).await?,
        quantities: fetch_as(source).await?,
        sales: fetch_as(source).await?,
        suppliers: fetch_as(source).await?,
        purchase_orders: fetch_as(source).await?,
        warehouses: fetch_as(source).await?,
        bins: fetch_as(source).await?,
        transfers: fetch_as(source).await?,
        returns: fetch_as(source).await?,
        cycle_counts: fetch_as(source).await?,
        adjustments: fetch_as(source).await?,
    })
}

// =============================================================================
// Demo data
// =============================================================================

/// Serves a fixed [`Dataset`].
#[derive(Debug, Clone)]
pub struct DemoSource {
    dataset: Dataset,
}

impl DemoSource {
    /// Serve the built-in demo data, dated relative to now.
    pub fn new() -> Self {
        Self::with_dataset(demo_dataset(Utc::now()))
    }

    /// Serve the given data.
    pub fn with_dataset(dataset: Dataset) -> Self {
        Self { dataset }
    }

    /// The data being served.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

impl Default for DemoSource {
    fn default() -> Self {
        Self::new()
    }
}

fn encode<T: Serialize>(kind: EntityKind, rows: &[T]) -> Result<serde_json::Value, SourceError> {
    serde_json::to_value(rows).map_err(|source| SourceError::Decode {
        entity: kind.name(),
        source,
    })
}

#[async_trait]
impl DataSource for DemoSource {
    async fn fetch(&self, kind: EntityKind) -> Result<serde_json::Value, SourceError> {
        let d = &self.dataset;
        match kind {
            EntityKind::ItemTypes => encode(kind, &d.types),
            EntityKind::Brands => encode(kind, &d.brands),
            EntityKind::Items => encode(kind, &d.items),
            EntityKind::Inventory => encode(kind, &d.quantities),
            EntityKind::Sales => encode(kind, &d.sales),
            EntityKind::Suppliers => encode(kind, &d.suppliers),
            EntityKind::PurchaseOrders => encode(kind, &d.purchase_orders),
            EntityKind::Warehouses => encode(kind, &d.warehouses),
            EntityKind::Bins => encode(kind, &d.bins),
            EntityKind::Transfers => encode(kind, &d.transfers),
            EntityKind::Returns => encode(kind, &d.returns),
            EntityKind::CycleCounts => encode(kind, &d.cycle_counts),
            EntityKind::Adjustments => encode(kind, &d.adjustments),
        }
    }
}

// =============================================================================
// JSON file
// =============================================================================

/// Reads collections from a JSON export: one object whose keys are
/// collection names (`"items"`, `"purchase-orders"`, ...) and whose values
/// are arrays in the backend shape.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Read from the export at `path`. The file is read on every fetch.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DataSource for JsonFileSource {
    async fn fetch(&self, kind: EntityKind) -> Result<serde_json::Value, SourceError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SourceError::Unavailable(format!("{}: {}", self.path.display(), e)))?;
        let mut root: serde_json::Value =
            serde_json::from_str(&raw).map_err(|source| SourceError::Decode {
                entity: kind.name(),
                source,
            })?;
        match root.get_mut(kind.name()) {
            Some(collection) => Ok(collection.take()),
            None => Err(SourceError::Unavailable(format!(
                "{} has no '{}' collection",
                self.path.display(),
                kind.name()
            ))),
        }
    }
}

// =============================================================================
// Fallback
// =============================================================================

/// Tries a primary source and falls back to demo data per collection.
///
/// In demo mode, or without a primary source, only the demo data is used.
pub struct FallbackSource {
    primary: Option<Box<dyn DataSource>>,
    demo: DemoSource,
    demo_only: bool,
}

impl FallbackSource {
    /// Ask `primary` first and fall back to `demo`.
    pub fn new(primary: impl DataSource + 'static, demo: DemoSource) -> Self {
        Self {
            primary: Some(Box::new(primary)),
            demo,
            demo_only: false,
        }
    }

    /// Serve only the demo data.
    pub fn demo(demo: DemoSource) -> Self {
        Self {
            primary: None,
            demo,
            demo_only: true,
        }
    }

    /// Skip the primary source entirely.
    pub fn demo_only(mut self, demo_only: bool) -> Self {
        self.demo_only = demo_only;
        self
    }

    /// Load one collection, falling back on fetch or decode failure.
    pub async fn collection<T: Tabular>(&self) -> Vec<T> {
        if let Some(primary) = self.primary() {
            match fetch_as::<T>(primary).await {
                Ok(rows) => return rows,
                Err(e) => warn!("using demo {}: {}", T::KIND, e),
            }
        }
        match fetch_as::<T>(&self.demo).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!("demo {} unavailable: {}", T::KIND, e);
                Vec::new()
            }
        }
    }

    fn primary(&self) -> Option<&dyn DataSource> {
        if self.demo_only {
            return None;
        }
        self.primary.as_deref()
    }

    /// Load every collection, each falling back on its own.
    pub async fn dataset(&self) -> Dataset {
        debug!("loading dataset (demo only: {})", self.demo_only);
        Dataset {
            types: self.collection().await,
            brands: self.collection().await,
            items: self.collection().await,
            quantities: self.collection().await,
            sales: self.collection().await,
            suppliers: self.collection().await,
            purchase_orders: self.collection().await,
            warehouses: self.collection().await,
            bins: self.collection().await,
            transfers: self.collection().await,
            returns: self.collection().await,
            cycle_counts: self.collection().await,
            adjustments: self.collection().await,
        }
    }
}

impl std::fmt::Debug for FallbackSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackSource")
            .field("demo_only", &self.demo_only)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DataSource for FallbackSource {
    async fn fetch(&self, kind: EntityKind) -> Result<serde_json::Value, SourceError> {
        if let Some(primary) = self.primary() {
            match primary.fetch(kind).await {
                Ok(raw) => return Ok(raw),
                Err(e) => warn!("using demo {}: {}", kind, e),
            }
        }
        self.demo.fetch(kind).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{Item, Supplier};

    struct Offline;

    #[async_trait]
    impl DataSource for Offline {
        async fn fetch(&self, _kind: EntityKind) -> Result<serde_json::Value, SourceError> {
            Err(SourceError::Unavailable("connection refused".into()))
        }
    }

    struct Garbage;

    #[async_trait]
    impl DataSource for Garbage {
        async fn fetch(&self, _kind: EntityKind) -> Result<serde_json::Value, SourceError> {
            Ok(serde_json::json!([{ "id": "not a number" }]))
        }
    }

    #[tokio::test]
    async fn test_demo_round_trips() {
        let demo = DemoSource::new();
        let dataset = load_dataset(&demo).await.unwrap();
        assert_eq!(&dataset, demo.dataset());
    }

    #[tokio::test]
    async fn test_decode_error_names_collection() {
        let err = fetch_as::<Item>(&Garbage).await.unwrap_err();
        assert!(matches!(err, SourceError::Decode { entity: "items", .. }));
    }

    #[tokio::test]
    async fn test_fallback_on_offline_and_garbage() {
        let demo = DemoSource::new();
        let expected = demo.dataset().clone();

        let offline = FallbackSource::new(Offline, demo.clone());
        assert_eq!(offline.dataset().await, expected);

        let garbage = FallbackSource::new(Garbage, demo);
        let items: Vec<Item> = garbage.collection().await;
        assert_eq!(items, expected.items);
    }

    #[tokio::test]
    async fn test_demo_only_skips_primary() {
        let demo = DemoSource::with_dataset(Dataset::default());
        let source = FallbackSource::new(DemoSource::new(), demo).demo_only(true);
        let suppliers: Vec<Supplier> = source.collection().await;
        assert!(suppliers.is_empty());
    }

    #[tokio::test]
    async fn test_demo_constructor_serves_demo() {
        let demo = DemoSource::new();
        let expected = demo.dataset().clone();
        let source = FallbackSource::demo(demo);
        assert_eq!(source.dataset().await, expected);
        let raw = source.fetch(EntityKind::Bins).await.unwrap();
        assert_eq!(raw.as_array().map(Vec::len), Some(expected.bins.len()));
    }

    #[tokio::test]
    async fn test_json_file_source() {
        let path = std::env::temp_dir().join(format!("stockroom-source-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"items":[{"id":7,"itemName":"Kettle","itemBrandId":1,"status":true}]}"#,
        )
        .unwrap();

        let source = JsonFileSource::new(&path);
        let items: Vec<Item> = fetch_as(&source).await.unwrap();
        assert_eq!(items[0].item_name, "Kettle");
        assert!(matches!(
            fetch_as::<Supplier>(&source).await,
            Err(SourceError::Unavailable(_))
        ));

        std::fs::remove_file(&path).unwrap();
    }
}
