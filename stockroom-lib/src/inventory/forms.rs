//! Entity input forms.
//!
//! A form holds what the user typed, as text, and turns it into an entity
//! with `validate`. Validation is pure and reports every failing field at
//! once. Ids of new records are `0` until the backend assigns one.
//!
//! Forms also decode from a JSON object keyed like the entity
//! (`{"itemName": "Kettle", "itemBrandId": 1}`), which is what
//! [`validate_json`] takes.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::EntityKind;
use super::entities::*;
use crate::error::{FieldValidationError, ValidationError};

/// Field name used for errors about the input as a whole.
pub const RECORD_FIELD: &str = "record";

/// Collects field errors while a form is converted.
#[derive(Debug, Default)]
struct Validator {
    errors: Vec<FieldValidationError>,
}

impl Validator {
    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldValidationError::new(field, message));
    }

    /// Non-empty text, trimmed.
    fn required(&mut self, field: &str, raw: &str) -> String {
        let text = raw.trim();
        if text.is_empty() {
            self.fail(field, "Required");
        }
        text.to_string()
    }

    /// Text that may be left blank.
    fn optional(&self, raw: &str) -> Option<String> {
        let text = raw.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    /// A number that must be present.
    fn number<T: FromStr + Default>(&mut self, field: &str, raw: &str) -> T {
        match self.optional_number(field, raw) {
            Some(value) => value,
            None => {
                if raw.trim().is_empty() {
                    self.fail(field, "Expected number");
                }
                T::default()
            }
        }
    }

    /// A number that may be left blank.
    fn optional_number<T: FromStr>(&mut self, field: &str, raw: &str) -> Option<T> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }
        match text.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                self.fail(field, "Expected number");
                None
            }
        }
    }

    fn at_least(&mut self, field: &str, value: i64, min: i64) {
        if value < min {
            self.fail(field, format!("Must be at least {}", min));
        }
    }

    fn email(&mut self, field: &str, raw: &str) -> Option<String> {
        let email = self.optional(raw)?;
        let valid = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && !email.contains(char::is_whitespace)
            }
            None => false,
        };
        if !valid {
            self.fail(field, "Invalid email");
        }
        Some(email)
    }

    /// A calendar date (`YYYY-MM-DD`) or a full RFC 3339 timestamp.
    fn date(&mut self, field: &str, raw: &str) -> Option<DateTime<Utc>> {
        let text = self.optional(raw)?;
        if let Ok(at) = DateTime::parse_from_rfc3339(&text) {
            return Some(at.with_timezone(&Utc));
        }
        match NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
            Ok(date) => date.and_hms_opt(0, 0, 0).map(|at| at.and_utc()),
            Err(_) => {
                self.fail(field, "Invalid date");
                None
            }
        }
    }

    fn choice<T: FromStr>(&mut self, field: &str, raw: &str) -> Option<T> {
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                self.fail(field, "Invalid option");
                None
            }
        }
    }

    fn finish<T>(self, value: T) -> Result<T, ValidationError> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError {
                fields: self.errors,
            })
        }
    }
}

macro_rules! impl_from_str_for_status {
    ($ty:ty, $($variant:ident),+) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok(<$ty>::$variant),)+
                    other => Err(format!("unknown value '{}'", other)),
                }
            }
        }
    };
}

impl_from_str_for_status!(PurchaseOrderStatus, Draft, Approved, Received, Closed, Cancelled);
impl_from_str_for_status!(ReturnKind, Supplier, Customer);
impl_from_str_for_status!(ReturnStatus, Requested, Approved, Rejected, Completed);
impl_from_str_for_status!(CycleCountStatus, Planned, InProgress, Completed);

// =============================================================================
// Forms
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemTypeForm {
    pub id: Option<i64>,
    #[serde(rename = "type")]
    pub name: String,
    pub status: bool,
}

impl Default for ItemTypeForm {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            status: true,
        }
    }
}

impl ItemTypeForm {
    pub fn validate(self) -> Result<ItemType, ValidationError> {
        let mut v = Validator::default();
        let name = v.required("type", &self.name);
        v.finish(ItemType {
            id: self.id.unwrap_or_default(),
            name,
            status: self.status,
            created_at: None,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrandForm {
    pub id: Option<i64>,
    pub brand_name: String,
    pub item_type_id: String,
    pub status: bool,
}

impl Default for BrandForm {
    fn default() -> Self {
        Self {
            id: None,
            brand_name: String::new(),
            item_type_id: String::new(),
            status: true,
        }
    }
}

impl BrandForm {
    pub fn validate(self) -> Result<Brand, ValidationError> {
        let mut v = Validator::default();
        let brand_name = v.required("brandName", &self.brand_name);
        let item_type_id = v.number("itemTypeId", &self.item_type_id);
        v.finish(Brand {
            id: self.id.unwrap_or_default(),
            brand_name,
            item_type_id,
            status: self.status,
            created_at: None,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemForm {
    pub id: Option<i64>,
    pub item_name: String,
    pub item_brand_id: String,
    pub status: bool,
}

impl Default for ItemForm {
    fn default() -> Self {
        Self {
            id: None,
            item_name: String::new(),
            item_brand_id: String::new(),
            status: true,
        }
    }
}

impl ItemForm {
    pub fn validate(self) -> Result<Item, ValidationError> {
        let mut v = Validator::default();
        let item_name = v.required("itemName", &self.item_name);
        let item_brand_id = v.number("itemBrandId", &self.item_brand_id);
        v.finish(Item {
            id: self.id.unwrap_or_default(),
            item_name,
            item_brand_id,
            status: self.status,
            created_at: None,
        })
    }
}

/// A new stock batch. Lot and expiry may be left blank.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuantityForm {
    pub id: Option<i64>,
    pub item_id: String,
    pub inventory_id: String,
    pub purchase_price: String,
    pub quantity: String,
    pub lot_number: String,
    pub expiry_date: String,
    pub status: bool,
}

impl Default for QuantityForm {
    fn default() -> Self {
        Self {
            id: None,
            item_id: String::new(),
            inventory_id: String::new(),
            purchase_price: String::new(),
            quantity: String::new(),
            lot_number: String::new(),
            expiry_date: String::new(),
            status: true,
        }
    }
}

impl QuantityForm {
    pub fn validate(self) -> Result<Quantity, ValidationError> {
        let mut v = Validator::default();
        let item_id = v.number("itemId", &self.item_id);
        let inventory_id = v.number("inventoryId", &self.inventory_id);
        let purchase_price: Decimal = v.number("purchasePrice", &self.purchase_price);
        let quantity = v.number("quantity", &self.quantity);
        let lot_number = v.optional(&self.lot_number);
        let expiry_date = v.date("expiryDate", &self.expiry_date);
        v.finish(Quantity {
            id: self.id.unwrap_or_default(),
            item_id,
            inventory_id,
            quantity,
            purchase_price,
            status: self.status,
            created_at: None,
            lot_number,
            expiry_date,
            serials: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaleForm {
    pub id: Option<i64>,
    pub item_quantity_id: String,
    pub inventory_id: String,
    pub sale_price: String,
    pub status: bool,
}

impl Default for SaleForm {
    fn default() -> Self {
        Self {
            id: None,
            item_quantity_id: String::new(),
            inventory_id: String::new(),
            sale_price: String::new(),
            status: true,
        }
    }
}

impl SaleForm {
    /// Prefill the batch fields from a FEFO pick.
    pub fn with_batch(mut self, batch: &Quantity) -> Self {
        self.item_quantity_id = batch.id.to_string();
        self.inventory_id = batch.inventory_id.to_string();
        self
    }

    pub fn validate(self) -> Result<Sale, ValidationError> {
        let mut v = Validator::default();
        let item_quantity_id = v.number("itemQuantityId", &self.item_quantity_id);
        let inventory_id = v.number("inventoryId", &self.inventory_id);
        let sale_price = v.number("salePrice", &self.sale_price);
        v.finish(Sale {
            id: self.id.unwrap_or_default(),
            item_quantity_id,
            inventory_id,
            sale_price,
            status: self.status,
            created_at: None,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SupplierForm {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub lead_time_days: String,
    pub terms: String,
    pub rating: String,
    pub status: bool,
}

impl Default for SupplierForm {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            lead_time_days: String::new(),
            terms: String::new(),
            rating: String::new(),
            status: true,
        }
    }
}

impl SupplierForm {
    pub fn validate(self) -> Result<Supplier, ValidationError> {
        let mut v = Validator::default();
        let name = v.required("name", &self.name);
        let email = v.email("email", &self.email);
        let phone = v.optional(&self.phone);
        let lead_time_days = v.optional_number("leadTimeDays", &self.lead_time_days);
        let terms = v.optional(&self.terms);
        let rating = v.optional_number("rating", &self.rating);
        v.finish(Supplier {
            id: self.id.unwrap_or_default(),
            name,
            email,
            phone,
            lead_time_days,
            terms,
            rating,
            status: self.status,
            created_at: None,
        })
    }
}

/// A new purchase order. Orders always start as drafts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PurchaseOrderForm {
    pub supplier_id: String,
    pub expected_date: String,
    pub notes: String,
}

impl PurchaseOrderForm {
    pub fn validate(self) -> Result<PurchaseOrder, ValidationError> {
        let mut v = Validator::default();
        let supplier_id = v.number("supplierId", &self.supplier_id);
        let expected_date = v.date("expectedDate", &self.expected_date);
        let notes = v.optional(&self.notes);
        v.finish(PurchaseOrder {
            id: 0,
            supplier_id,
            status: PurchaseOrderStatus::Draft,
            expected_date,
            notes,
            created_at: None,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WarehouseForm {
    pub id: Option<i64>,
    pub name: String,
    pub code: String,
    pub status: bool,
}

impl Default for WarehouseForm {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            code: String::new(),
            status: true,
        }
    }
}

impl WarehouseForm {
    pub fn validate(self) -> Result<Warehouse, ValidationError> {
        let mut v = Validator::default();
        let name = v.required("name", &self.name);
        let code = v.required("code", &self.code);
        v.finish(Warehouse {
            id: self.id.unwrap_or_default(),
            name,
            code,
            status: self.status,
            created_at: None,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BinForm {
    pub id: Option<i64>,
    pub warehouse_id: String,
    pub code: String,
    pub zone: String,
    pub status: bool,
}

impl Default for BinForm {
    fn default() -> Self {
        Self {
            id: None,
            warehouse_id: String::new(),
            code: String::new(),
            zone: String::new(),
            status: true,
        }
    }
}

impl BinForm {
    pub fn validate(self) -> Result<Bin, ValidationError> {
        let mut v = Validator::default();
        let warehouse_id = v.number("warehouseId", &self.warehouse_id);
        let code = v.required("code", &self.code);
        let zone = v.optional(&self.zone);
        v.finish(Bin {
            id: self.id.unwrap_or_default(),
            warehouse_id,
            code,
            zone,
            status: self.status,
            created_at: None,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransferForm {
    pub id: Option<i64>,
    pub from_warehouse_id: String,
    pub to_warehouse_id: String,
    pub from_bin_id: String,
    pub to_bin_id: String,
    pub item_id: String,
    pub quantity: String,
    pub notes: String,
}

impl TransferForm {
    pub fn validate(self) -> Result<Transfer, ValidationError> {
        let mut v = Validator::default();
        let from_warehouse_id = v.number("fromWarehouseId", &self.from_warehouse_id);
        let to_warehouse_id = v.number("toWarehouseId", &self.to_warehouse_id);
        let from_bin_id = v.optional_number("fromBinId", &self.from_bin_id);
        let to_bin_id = v.optional_number("toBinId", &self.to_bin_id);
        let item_id = v.optional_number("itemId", &self.item_id);
        let quantity = v.number("quantity", &self.quantity);
        v.at_least("quantity", quantity, 1);
        let notes = v.optional(&self.notes);
        v.finish(Transfer {
            id: self.id.unwrap_or_default(),
            from_warehouse_id,
            to_warehouse_id,
            from_bin_id,
            to_bin_id,
            item_id,
            quantity,
            notes,
            created_at: None,
        })
    }
}

/// A return request. The status defaults to `Requested` when left blank.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReturnForm {
    pub id: Option<i64>,
    pub kind: String,
    pub item_id: String,
    pub quantity: String,
    pub reason: String,
    pub status: String,
    pub notes: String,
}

impl ReturnForm {
    pub fn validate(self) -> Result<Return, ValidationError> {
        let mut v = Validator::default();
        // placeholder only; an unknown kind fails the form
        let kind = v.choice("kind", &self.kind).unwrap_or(ReturnKind::Customer);
        let item_id = v.number("itemId", &self.item_id);
        let quantity = v.number("quantity", &self.quantity);
        v.at_least("quantity", quantity, 1);
        let reason = v.required("reason", &self.reason);
        let status = match v.optional(&self.status) {
            Some(raw) => v.choice("status", &raw).unwrap_or_default(),
            None => ReturnStatus::default(),
        };
        let notes = v.optional(&self.notes);
        v.finish(Return {
            id: self.id.unwrap_or_default(),
            kind,
            item_id,
            quantity,
            reason,
            status,
            notes,
            created_at: None,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CycleCountForm {
    pub id: Option<i64>,
    pub warehouse_id: String,
    pub bin_id: String,
    pub scheduled_date: String,
    pub status: String,
}

impl CycleCountForm {
    pub fn validate(self) -> Result<CycleCount, ValidationError> {
        let mut v = Validator::default();
        let warehouse_id = v.optional_number("warehouseId", &self.warehouse_id);
        let bin_id = v.optional_number("binId", &self.bin_id);
        let scheduled_date = v.date("scheduledDate", &self.scheduled_date);
        let status = match v.optional(&self.status) {
            Some(raw) => v.choice("status", &raw).unwrap_or_default(),
            None => CycleCountStatus::default(),
        };
        v.finish(CycleCount {
            id: self.id.unwrap_or_default(),
            warehouse_id,
            bin_id,
            scheduled_date,
            status,
            variance: None,
            created_at: None,
        })
    }
}

/// A stock adjustment. Quantity may be negative; new adjustments start
/// unapproved.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdjustmentForm {
    pub id: Option<i64>,
    pub item_id: String,
    pub quantity: String,
    pub reason: String,
    pub approved: bool,
}

impl AdjustmentForm {
    pub fn validate(self) -> Result<Adjustment, ValidationError> {
        let mut v = Validator::default();
        let item_id = v.number("itemId", &self.item_id);
        let quantity = v.number("quantity", &self.quantity);
        let reason = v.required("reason", &self.reason);
        v.finish(Adjustment {
            id: self.id.unwrap_or_default(),
            item_id,
            quantity,
            reason,
            approved: self.approved,
            created_at: None,
        })
    }
}

// =============================================================================
// JSON input
// =============================================================================

/// Validate one record of a collection given as a JSON object, returning
/// the entity in backend shape.
///
/// Numbers are accepted wherever the form expects typed text; `null` counts
/// as left blank. Input that is not an object, or whose fields have the
/// wrong shape, fails on [`RECORD_FIELD`].
pub fn validate_json(
    kind: EntityKind,
    input: &serde_json::Value,
) -> Result<serde_json::Value, ValidationError> {
    let serde_json::Value::Object(fields) = input else {
        return Err(record_error("Expected object"));
    };
    let fields: serde_json::Map<String, serde_json::Value> = fields
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::Number(n) if key != "id" => {
                    serde_json::Value::String(n.to_string())
                }
                other => other.clone(),
            };
            (key.clone(), value)
        })
        .collect();
    let input = serde_json::Value::Object(fields);

    match kind {
        EntityKind::ItemTypes => check(input, ItemTypeForm::validate),
        EntityKind::Brands => check(input, BrandForm::validate),
        EntityKind::Items => check(input, ItemForm::validate),
        EntityKind::Inventory => check(input, QuantityForm::validate),
        EntityKind::Sales => check(input, SaleForm::validate),
        EntityKind::Suppliers => check(input, SupplierForm::validate),
        EntityKind::PurchaseOrders => check(input, PurchaseOrderForm::validate),
        EntityKind::Warehouses => check(input, WarehouseForm::validate),
        EntityKind::Bins => check(input, BinForm::validate),
        EntityKind::Transfers => check(input, TransferForm::validate),
        EntityKind::Returns => check(input, ReturnForm::validate),
        EntityKind::CycleCounts => check(input, CycleCountForm::validate),
        EntityKind::Adjustments => check(input, AdjustmentForm::validate),
    }
}

fn check<F, E>(
    input: serde_json::Value,
    validate: fn(F) -> Result<E, ValidationError>,
) -> Result<serde_json::Value, ValidationError>
where
    F: DeserializeOwned,
    E: Serialize,
{
    let form: F = serde_json::from_value(input).map_err(|e| record_error(e.to_string()))?;
    let entity = validate(form)?;
    serde_json::to_value(entity).map_err(|e| record_error(e.to_string()))
}

fn record_error(message: impl Into<String>) -> ValidationError {
    ValidationError {
        fields: vec![FieldValidationError::new(RECORD_FIELD, message)],
    }
}
