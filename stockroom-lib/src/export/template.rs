//! Header-only CSV templates for bulk imports.

use super::ExportData;
use crate::inventory::EntityKind;

/// A downloadable import template: a CSV file holding only a header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportTemplate {
    pub kind: EntityKind,
    /// Display name, also the file name stem.
    pub name: &'static str,
    pub headers: &'static [&'static str],
}

/// Every collection that can be imported, in display order.
pub const IMPORT_TEMPLATES: [ImportTemplate; 4] = [
    ImportTemplate {
        kind: EntityKind::Items,
        name: "Items",
        headers: &["id", "itemName", "itemBrandId", "status"],
    },
    ImportTemplate {
        kind: EntityKind::Suppliers,
        name: "Suppliers",
        headers: &[
            "id",
            "name",
            "email",
            "phone",
            "leadTimeDays",
            "terms",
            "rating",
            "status",
        ],
    },
    ImportTemplate {
        kind: EntityKind::Inventory,
        name: "Inventory",
        headers: &[
            "id",
            "itemId",
            "inventoryId",
            "quantity",
            "purchasePrice",
            "lotNumber",
            "expiryDate",
            "status",
        ],
    },
    ImportTemplate {
        kind: EntityKind::PurchaseOrders,
        name: "PurchaseOrders",
        headers: &["id", "supplierId", "status", "expectedDate", "notes"],
    },
];

impl ImportTemplate {
    /// `<Name>.template.csv`
    pub fn file_name(&self) -> String {
        format!("{}.template.csv", self.name)
    }

    /// The template as an export snapshot with no rows.
    pub fn data(&self) -> ExportData {
        ExportData {
            headers: self.headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }
}

/// The import template of a collection, if it can be imported.
pub fn import_template(kind: EntityKind) -> Option<&'static ImportTemplate> {
    IMPORT_TEMPLATES.iter().find(|t| t.kind == kind)
}

/// Header-only snapshot for a collection's import template.
pub fn template(kind: EntityKind) -> Option<ExportData> {
    import_template(kind).map(ImportTemplate::data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::to_csv_string;

    #[test]
    fn test_template_headers() {
        let headers = |kind| template(kind).unwrap().headers;
        assert_eq!(headers(EntityKind::Items), vec!["id", "itemName", "itemBrandId", "status"]);
        assert_eq!(
            headers(EntityKind::Suppliers),
            vec!["id", "name", "email", "phone", "leadTimeDays", "terms", "rating", "status"]
        );
        assert_eq!(
            headers(EntityKind::Inventory),
            vec![
                "id",
                "itemId",
                "inventoryId",
                "quantity",
                "purchasePrice",
                "lotNumber",
                "expiryDate",
                "status"
            ]
        );
        assert_eq!(
            headers(EntityKind::PurchaseOrders),
            vec!["id", "supplierId", "status", "expectedDate", "notes"]
        );
    }

    #[test]
    fn test_only_importable_collections() {
        assert!(template(EntityKind::Sales).is_none());
        assert!(import_template(EntityKind::Bins).is_none());
        let importable: Vec<EntityKind> = IMPORT_TEMPLATES.iter().map(|t| t.kind).collect();
        assert_eq!(importable.len(), 4);
    }

    #[test]
    fn test_template_file() {
        let items = import_template(EntityKind::Items).unwrap();
        assert_eq!(items.file_name(), "Items.template.csv");
        assert_eq!(
            to_csv_string(&items.data()).unwrap(),
            "id,itemName,itemBrandId,status\n"
        );
    }
}
