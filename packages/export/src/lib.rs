#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Tabular export adapters.
//!
//! Serializes a [`RecordSet`] (full extraction or match subset) to CSV or
//! to a JSON array of field-name→value objects. Field order follows the
//! header spec in both formats; missing numeric cells serialize as an
//! empty CSV field and as JSON `null`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rollcheck_table_models::{CellValue, RecordSet};

/// Errors specific to export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Output format for the export adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// JSON array of objects keyed by field name.
    Json,
}

/// Writes the record set as CSV: one header row, then one row per record.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] if serialization fails.
pub fn write_csv<W: Write>(writer: W, set: &RecordSet) -> Result<(), ExportError> {
    let mut out = csv::Writer::from_writer(writer);

    out.write_record(set.header.fields())?;
    for record in &set.records {
        out.write_record(record.cells().iter().map(ToString::to_string))?;
    }
    out.flush()?;

    Ok(())
}

/// Converts the record set to a JSON array of field-name→value objects,
/// preserving header field order.
#[must_use]
pub fn to_json(set: &RecordSet) -> serde_json::Value {
    let rows: Vec<serde_json::Value> = set
        .records
        .iter()
        .map(|record| {
            let mut map = serde_json::Map::new();
            for (field, cell) in set.header.fields().iter().zip(record.cells()) {
                let value = match cell {
                    CellValue::Text(s) => serde_json::Value::String(s.clone()),
                    CellValue::Number(n) => serde_json::Number::from_f64(*n)
                        .map_or(serde_json::Value::Null, serde_json::Value::Number),
                    CellValue::Missing => serde_json::Value::Null,
                };
                map.insert(field.clone(), value);
            }
            serde_json::Value::Object(map)
        })
        .collect();

    serde_json::Value::Array(rows)
}

/// Writes the record set to a file in the given format.
///
/// # Errors
///
/// Returns [`ExportError`] if the file cannot be created or serialization
/// fails.
pub fn write_file(path: &Path, set: &RecordSet, format: ExportFormat) -> Result<(), ExportError> {
    let file = BufWriter::new(File::create(path)?);

    match format {
        ExportFormat::Csv => write_csv(file, set)?,
        ExportFormat::Json => {
            let mut file = file;
            serde_json::to_writer_pretty(&mut file, &to_json(set))?;
            file.write_all(b"\n")?;
        }
    }

    log::info!("Wrote {} record(s) to {}", set.len(), path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use rollcheck_table_models::{HeaderSpec, Record};

    use super::*;

    fn sample() -> RecordSet {
        let header = HeaderSpec::new(vec!["ROLL NO".into(), "NAME".into(), "MARKS".into()]);
        let mut set = RecordSet::new(header);
        set.push(Record::new(vec![
            CellValue::Text("800001".into()),
            CellValue::Text("A KUMAR".into()),
            CellValue::Number(85.0),
        ]));
        set.push(Record::new(vec![
            CellValue::Text("800002".into()),
            CellValue::Text("B SINGH".into()),
            CellValue::Missing,
        ]));
        set
    }

    #[test]
    fn csv_has_header_row_and_empty_missing_cells() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &sample()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ROLL NO,NAME,MARKS");
        assert_eq!(lines[1], "800001,A KUMAR,85");
        assert_eq!(lines[2], "800002,B SINGH,");
    }

    #[test]
    fn json_preserves_field_order_and_nulls_missing() {
        let json = to_json(&sample());
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 2);

        let keys: Vec<&String> = rows[0].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["ROLL NO", "NAME", "MARKS"]);
        assert_eq!(rows[0]["MARKS"], 85.0);
        assert!(rows[1]["MARKS"].is_null());
    }

    #[test]
    fn empty_record_set_exports_header_only() {
        let set = RecordSet::new(HeaderSpec::new(vec!["ROLL NO".into()]));
        let mut buf = Vec::new();
        write_csv(&mut buf, &set).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "ROLL NO\n");
        assert_eq!(to_json(&set), serde_json::Value::Array(Vec::new()));
    }
}
