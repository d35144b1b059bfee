//! CSV export of table views.
//!
//! The table controller only produces an [`ExportData`] snapshot; turning
//! it into bytes happens here, as does building the header-only import
//! templates ([`import_template`]).

mod template;

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::ExportError;

pub use template::*;

/// The visible columns of a view over its filtered and sorted rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportData {
    /// Column ids, in display order.
    pub headers: Vec<String>,
    /// Cell text per row, aligned with `headers`.
    pub rows: Vec<Vec<String>>,
}

impl ExportData {
    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Write a snapshot as CSV: a header line, then one line per row.
///
/// Fields containing delimiters, quotes or newlines are quoted.
pub fn write_csv<W: Write>(data: &ExportData, writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    wtr.write_record(&data.headers)?;
    for row in &data.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render a snapshot as a CSV string.
pub fn to_csv_string(data: &ExportData) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_csv(data, &mut buf)?;
    // csv only ever writes the UTF-8 it was given
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write a snapshot to a file, replacing it if it exists.
pub fn export_to_file(data: &ExportData, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_csv(data, file)?;
    log::info!("exported {} row(s) to {}", data.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> ExportData {
        ExportData {
            headers: vec!["id".into(), "name".into()],
            rows: vec![
                vec!["1".into(), "Widget".into()],
                vec!["2".into(), "Gadget, large".into()],
                vec!["3".into(), "12\" pipe".into()],
            ],
        }
    }

    #[test]
    fn test_write_csv() {
        let csv = to_csv_string(&data()).unwrap();
        assert_eq!(
            csv,
            "id,name\n1,Widget\n2,\"Gadget, large\"\n3,\"12\"\" pipe\"\n"
        );
    }

    #[test]
    fn test_headers_only_when_empty() {
        let data = ExportData {
            headers: vec!["id".into()],
            rows: Vec::new(),
        };
        assert!(data.is_empty());
        assert_eq!(to_csv_string(&data).unwrap(), "id\n");
    }
}
