//! Inventory entities and their table columns.
//!
//! Every entity deserializes from the backend's camelCase JSON and exposes
//! its fields to tables under the same camelCase names.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::EntityKind;
use crate::model::{TableRow, Value};
use crate::table::{Column, active_badge};

/// An entity that has a table of its own.
pub trait Tabular: TableRow + Serialize + DeserializeOwned {
    /// The collection this entity lives in.
    const KIND: EntityKind;

    /// Column definitions, in natural order.
    fn columns() -> Vec<Column>;
}

/// Renders date-times as `YYYY-MM-DD`.
pub fn date_cell(value: &Value) -> String {
    match value {
        Value::DateTime(at) => at.format("%Y-%m-%d").to_string(),
        other => other.to_string(),
    }
}

fn status_column() -> Column {
    Column::new("status", "Status").cell(active_badge)
}

fn created_column() -> Column {
    Column::new("createdAt", "Created").cell(date_cell)
}

// =============================================================================
// Masters
// =============================================================================

/// A top-level item category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemType {
    pub id: i64,
    #[serde(rename = "type")]
    pub name: String,
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TableRow for ItemType {
    fn value(&self, column_id: &str) -> Value {
        match column_id {
            "id" => self.id.into(),
            "type" => self.name.as_str().into(),
            "status" => self.status.into(),
            "createdAt" => self.created_at.into(),
            _ => Value::Null,
        }
    }
}

impl Tabular for ItemType {
    const KIND: EntityKind = EntityKind::ItemTypes;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", "ID"),
            Column::new("type", "Type"),
            status_column(),
            created_column(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: i64,
    pub brand_name: String,
    pub item_type_id: i64,
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TableRow for Brand {
    fn value(&self, column_id: &str) -> Value {
        match column_id {
            "id" => self.id.into(),
            "brandName" => self.brand_name.as_str().into(),
            "itemTypeId" => self.item_type_id.into(),
            "status" => self.status.into(),
            "createdAt" => self.created_at.into(),
            _ => Value::Null,
        }
    }
}

impl Tabular for Brand {
    const KIND: EntityKind = EntityKind::Brands;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", "ID"),
            Column::new("brandName", "Brand"),
            Column::new("itemTypeId", "Type"),
            status_column(),
            created_column(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    pub item_name: String,
    pub item_brand_id: i64,
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TableRow for Item {
    fn value(&self, column_id: &str) -> Value {
        match column_id {
            "id" => self.id.into(),
            "itemName" => self.item_name.as_str().into(),
            "itemBrandId" => self.item_brand_id.into(),
            "status" => self.status.into(),
            "createdAt" => self.created_at.into(),
            _ => Value::Null,
        }
    }
}

impl Tabular for Item {
    const KIND: EntityKind = EntityKind::Items;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", "ID"),
            Column::new("itemName", "Name"),
            Column::new("itemBrandId", "Brand"),
            status_column(),
        ]
    }
}

/// A stock batch of one item at one inventory location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quantity {
    pub id: i64,
    pub item_id: i64,
    pub inventory_id: i64,
    pub quantity: i64,
    pub purchase_price: Decimal,
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub serials: Vec<String>,
}

impl TableRow for Quantity {
    fn value(&self, column_id: &str) -> Value {
        match column_id {
            "id" => self.id.into(),
            "itemId" => self.item_id.into(),
            "inventoryId" => self.inventory_id.into(),
            "quantity" => self.quantity.into(),
            "purchasePrice" => self.purchase_price.into(),
            "status" => self.status.into(),
            "createdAt" => self.created_at.into(),
            "lotNumber" => self.lot_number.clone().into(),
            "expiryDate" => self.expiry_date.into(),
            "serials" => Value::from(self.serials.join(", ")),
            _ => Value::Null,
        }
    }
}

impl Tabular for Quantity {
    const KIND: EntityKind = EntityKind::Inventory;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", "ID"),
            Column::new("itemId", "Item"),
            Column::new("inventoryId", "Inventory ID"),
            Column::new("lotNumber", "Lot"),
            Column::new("expiryDate", "Expiry").cell(date_cell),
            Column::new("quantity", "Quantity"),
            Column::new("purchasePrice", "Purchase Price"),
            status_column(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: i64,
    pub item_quantity_id: i64,
    pub inventory_id: i64,
    pub sale_price: Decimal,
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TableRow for Sale {
    fn value(&self, column_id: &str) -> Value {
        match column_id {
            "id" => self.id.into(),
            "itemQuantityId" => self.item_quantity_id.into(),
            "inventoryId" => self.inventory_id.into(),
            "salePrice" => self.sale_price.into(),
            "status" => self.status.into(),
            "createdAt" => self.created_at.into(),
            _ => Value::Null,
        }
    }
}

impl Tabular for Sale {
    const KIND: EntityKind = EntityKind::Sales;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", "ID"),
            Column::new("itemQuantityId", "Batch"),
            Column::new("inventoryId", "Inventory ID"),
            Column::new("salePrice", "Sale Price"),
            status_column(),
            created_column(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_time_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Supplier {
    /// Email if known, else phone.
    pub fn contact(&self) -> Option<&str> {
        self.email.as_deref().or(self.phone.as_deref())
    }
}

impl TableRow for Supplier {
    fn value(&self, column_id: &str) -> Value {
        match column_id {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "contact" => self.contact().into(),
            "email" => self.email.clone().into(),
            "phone" => self.phone.clone().into(),
            "leadTimeDays" => self.lead_time_days.into(),
            "terms" => self.terms.clone().into(),
            "rating" => self.rating.into(),
            "status" => self.status.into(),
            "createdAt" => self.created_at.into(),
            _ => Value::Null,
        }
    }
}

impl Tabular for Supplier {
    const KIND: EntityKind = EntityKind::Suppliers;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", "ID"),
            Column::new("name", "Name"),
            Column::new("contact", "Contact"),
            Column::new("leadTimeDays", "Lead Time"),
            Column::new("terms", "Terms"),
            Column::new("rating", "Rating"),
            status_column(),
        ]
    }
}

// =============================================================================
// Operations
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseOrderStatus {
    #[default]
    Draft,
    Approved,
    Received,
    Closed,
    Cancelled,
}

impl PurchaseOrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PurchaseOrderStatus::Draft => "Draft",
            PurchaseOrderStatus::Approved => "Approved",
            PurchaseOrderStatus::Received => "Received",
            PurchaseOrderStatus::Closed => "Closed",
            PurchaseOrderStatus::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub id: i64,
    pub supplier_id: i64,
    pub status: PurchaseOrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TableRow for PurchaseOrder {
    fn value(&self, column_id: &str) -> Value {
        match column_id {
            "id" => self.id.into(),
            "supplierId" => self.supplier_id.into(),
            "status" => self.status.as_str().into(),
            "expectedDate" => self.expected_date.into(),
            "notes" => self.notes.clone().into(),
            "createdAt" => self.created_at.into(),
            _ => Value::Null,
        }
    }
}

impl Tabular for PurchaseOrder {
    const KIND: EntityKind = EntityKind::PurchaseOrders;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", "PO #"),
            Column::new("supplierId", "Supplier"),
            Column::new("status", "Status"),
            Column::new("expectedDate", "Expected").cell(date_cell),
            Column::new("notes", "Notes").sortable(false),
            created_column(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TableRow for Warehouse {
    fn value(&self, column_id: &str) -> Value {
        match column_id {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "code" => self.code.as_str().into(),
            "status" => self.status.into(),
            "createdAt" => self.created_at.into(),
            _ => Value::Null,
        }
    }
}

impl Tabular for Warehouse {
    const KIND: EntityKind = EntityKind::Warehouses;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", "ID"),
            Column::new("name", "Name"),
            Column::new("code", "Code"),
            status_column(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bin {
    pub id: i64,
    pub warehouse_id: i64,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TableRow for Bin {
    fn value(&self, column_id: &str) -> Value {
        match column_id {
            "id" => self.id.into(),
            "warehouseId" => self.warehouse_id.into(),
            "code" => self.code.as_str().into(),
            "zone" => self.zone.clone().into(),
            "status" => self.status.into(),
            "createdAt" => self.created_at.into(),
            _ => Value::Null,
        }
    }
}

impl Tabular for Bin {
    const KIND: EntityKind = EntityKind::Bins;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", "ID"),
            Column::new("warehouseId", "Warehouse"),
            Column::new("code", "Code"),
            Column::new("zone", "Zone"),
            status_column(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub id: i64,
    pub from_warehouse_id: i64,
    pub to_warehouse_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_bin_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_bin_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<i64>,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TableRow for Transfer {
    fn value(&self, column_id: &str) -> Value {
        match column_id {
            "id" => self.id.into(),
            "fromWarehouseId" => self.from_warehouse_id.into(),
            "toWarehouseId" => self.to_warehouse_id.into(),
            "fromBinId" => self.from_bin_id.into(),
            "toBinId" => self.to_bin_id.into(),
            "itemId" => self.item_id.into(),
            "quantity" => self.quantity.into(),
            "notes" => self.notes.clone().into(),
            "createdAt" => self.created_at.into(),
            _ => Value::Null,
        }
    }
}

impl Tabular for Transfer {
    const KIND: EntityKind = EntityKind::Transfers;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", "ID"),
            Column::new("fromWarehouseId", "From"),
            Column::new("toWarehouseId", "To"),
            Column::new("itemId", "Item"),
            Column::new("quantity", "Qty"),
            Column::new("notes", "Notes").sortable(false),
            created_column(),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnKind {
    Supplier,
    Customer,
}

impl ReturnKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReturnKind::Supplier => "Supplier",
            ReturnKind::Customer => "Customer",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnStatus {
    #[default]
    Requested,
    Approved,
    Rejected,
    Completed,
}

impl ReturnStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReturnStatus::Requested => "Requested",
            ReturnStatus::Approved => "Approved",
            ReturnStatus::Rejected => "Rejected",
            ReturnStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for ReturnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A supplier or customer return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Return {
    pub id: i64,
    pub kind: ReturnKind,
    pub item_id: i64,
    pub quantity: i64,
    pub reason: String,
    pub status: ReturnStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TableRow for Return {
    fn value(&self, column_id: &str) -> Value {
        match column_id {
            "id" => self.id.into(),
            "kind" => self.kind.as_str().into(),
            "itemId" => self.item_id.into(),
            "quantity" => self.quantity.into(),
            "reason" => self.reason.as_str().into(),
            "status" => self.status.as_str().into(),
            "notes" => self.notes.clone().into(),
            "createdAt" => self.created_at.into(),
            _ => Value::Null,
        }
    }
}

impl Tabular for Return {
    const KIND: EntityKind = EntityKind::Returns;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", "ID"),
            Column::new("kind", "Kind"),
            Column::new("itemId", "Item"),
            Column::new("quantity", "Qty"),
            Column::new("reason", "Reason"),
            Column::new("status", "Status"),
            created_column(),
        ]
    }
}

// =============================================================================
// Controls
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleCountStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
}

impl CycleCountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CycleCountStatus::Planned => "Planned",
            CycleCountStatus::InProgress => "InProgress",
            CycleCountStatus::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleCount {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<DateTime<Utc>>,
    pub status: CycleCountStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variance: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TableRow for CycleCount {
    fn value(&self, column_id: &str) -> Value {
        match column_id {
            "id" => self.id.into(),
            "warehouseId" => self.warehouse_id.into(),
            "binId" => self.bin_id.into(),
            "scheduledDate" => self.scheduled_date.into(),
            "status" => self.status.as_str().into(),
            "variance" => self.variance.into(),
            "createdAt" => self.created_at.into(),
            _ => Value::Null,
        }
    }
}

impl Tabular for CycleCount {
    const KIND: EntityKind = EntityKind::CycleCounts;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", "ID"),
            Column::new("warehouseId", "Warehouse"),
            Column::new("binId", "Bin"),
            Column::new("scheduledDate", "Scheduled").cell(date_cell),
            Column::new("status", "Status"),
            Column::new("variance", "Variance"),
        ]
    }
}

/// A manual stock correction. Negative quantities remove stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjustment {
    pub id: i64,
    pub item_id: i64,
    pub quantity: i64,
    pub reason: String,
    pub approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TableRow for Adjustment {
    fn value(&self, column_id: &str) -> Value {
        match column_id {
            "id" => self.id.into(),
            "itemId" => self.item_id.into(),
            "quantity" => self.quantity.into(),
            "reason" => self.reason.as_str().into(),
            "approved" => self.approved.into(),
            "createdAt" => self.created_at.into(),
            _ => Value::Null,
        }
    }
}

impl Tabular for Adjustment {
    const KIND: EntityKind = EntityKind::Adjustments;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", "ID"),
            Column::new("itemId", "Item"),
            Column::new("quantity", "Qty"),
            Column::new("reason", "Reason"),
            Column::new("approved", "Approved").cell(|v| match v {
                Value::Bool(true) => "Yes".to_string(),
                Value::Bool(false) => "No".to_string(),
                other => other.to_string(),
            }),
            created_column(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_json_shape() {
        let raw = r#"{"id":1,"type":"Electronics","status":true,"createdAt":"2024-05-01T10:00:00.000Z"}"#;
        let t: ItemType = serde_json::from_str(raw).unwrap();
        assert_eq!(t.name, "Electronics");
        assert_eq!(t.value("type"), Value::from("Electronics"));
        assert_eq!(date_cell(&t.value("createdAt")), "2024-05-01");

        let q: Quantity = serde_json::from_str(
            r#"{"id":1,"itemId":1,"inventoryId":1001,"quantity":50,"purchasePrice":800,"status":true}"#,
        )
        .unwrap();
        assert_eq!(q.value("purchasePrice").to_string(), "800");
        assert_eq!(q.value("expiryDate"), Value::Null);
    }

    #[test]
    fn test_supplier_contact_falls_back_to_phone() {
        let supplier = Supplier {
            id: 1,
            name: "Acme".into(),
            email: None,
            phone: Some("+1-555-0100".into()),
            lead_time_days: None,
            terms: None,
            rating: None,
            status: false,
            created_at: None,
        };
        assert_eq!(supplier.value("contact"), Value::from("+1-555-0100"));
        let status = Supplier::columns()
            .into_iter()
            .find(|c| c.id == "status")
            .unwrap();
        assert_eq!(status.render(&supplier), "Inactive");
    }

    #[test]
    fn test_enum_fields() {
        let r: Return = serde_json::from_str(
            r#"{"id":9001,"kind":"Customer","itemId":1,"quantity":1,"reason":"Damaged","status":"Requested"}"#,
        )
        .unwrap();
        assert_eq!(r.kind, ReturnKind::Customer);
        assert_eq!(r.value("status"), Value::from("Requested"));
    }
}
