//! Record normalization and pagination cleanup.
//!
//! Headers re-emitted on every page and `Page X of Y` markers survive text
//! extraction as ordinary lines; [`pre_filter`] removes them before any
//! grouping runs so the fixed-grouping strategy cannot misalign on them.
//! [`normalize_records`] then trims cells, applies optional uppercase
//! normalization, coerces designated numeric fields, and drops any record
//! that is itself a repeated header row. The whole pass is idempotent.

use regex::Regex;
use std::sync::LazyLock;

use rollcheck_table_models::{CellValue, ExtractOptions, HeaderSpec, Line, Record, RecordSet};

/// Matches pagination markers like `Page 3` or `Page 3 of 12`.
static PAGE_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^page\s+\d+(\s+of\s+\d+)?$").expect("valid regex"));

/// Whether a line is a pagination marker.
#[must_use]
pub fn is_pagination_marker(text: &str) -> bool {
    PAGE_MARKER_RE.is_match(text)
}

/// Removes lines that are pagination markers or exact repeats of a header
/// field name, returning the kept lines and the number removed.
#[must_use]
pub fn pre_filter(lines: &[Line], header: &HeaderSpec) -> (Vec<Line>, usize) {
    let mut kept = Vec::with_capacity(lines.len());
    let mut dropped = 0;

    for line in lines {
        if is_pagination_marker(&line.text) || header.fields().iter().any(|f| *f == line.text) {
            dropped += 1;
            continue;
        }
        kept.push(line.clone());
    }

    (kept, dropped)
}

/// Whether every cell of the record is a text cell equal to the header
/// field at its position (a header row re-emitted mid-document).
fn is_header_echo(record: &Record, header: &HeaderSpec) -> bool {
    record.cells().len() == header.len()
        && record
            .cells()
            .iter()
            .zip(header.fields())
            .all(|(cell, field)| cell.as_str() == Some(field.as_str()))
}

/// Coerces a text cell to a number, yielding the missing-value sentinel on
/// failure. Already-coerced cells pass through.
fn coerce_numeric(cell: CellValue) -> CellValue {
    match cell {
        CellValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_or(CellValue::Missing, CellValue::Number),
        other => other,
    }
}

/// Normalizes raw reconstructed records into the final [`RecordSet`].
///
/// Applies, in order: cell trimming, header-echo removal, optional
/// uppercase of cells and field names, and numeric coercion of the
/// designated fields. Returns the record set and the number of records
/// removed as header echoes.
#[must_use]
pub fn normalize_records(
    raw: Vec<Record>,
    header: &HeaderSpec,
    options: &ExtractOptions,
) -> (RecordSet, usize) {
    let final_header = if options.uppercase_fields {
        header.uppercased()
    } else {
        header.clone()
    };

    // Numeric designation is matched case-insensitively so the configured
    // names work whether or not field uppercasing is on.
    let numeric_positions: Vec<usize> = final_header
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, field)| {
            options
                .numeric_fields
                .iter()
                .any(|n| n.eq_ignore_ascii_case(field))
        })
        .map(|(i, _)| i)
        .collect();

    let mut set = RecordSet::new(final_header);
    let mut dropped = 0;

    for mut record in raw {
        for cell in record.cells_mut().iter_mut() {
            if let CellValue::Text(s) = cell {
                let trimmed = s.trim();
                if trimmed.len() != s.len() {
                    *s = trimmed.to_owned();
                }
            }
        }

        if is_header_echo(&record, header) {
            dropped += 1;
            continue;
        }

        if options.uppercase_cells {
            for cell in record.cells_mut().iter_mut() {
                if let CellValue::Text(s) = cell {
                    *s = s.to_uppercase();
                }
            }
        }

        for &pos in &numeric_positions {
            if let Some(cell) = record.cells_mut().get_mut(pos) {
                *cell = coerce_numeric(cell.clone());
            }
        }

        set.push(record);
    }

    (set, dropped)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rollcheck_table_models::Line;

    use super::*;

    fn header() -> HeaderSpec {
        HeaderSpec::new(vec!["ROLL NO".into(), "NAME".into(), "MARKS".into()])
    }

    #[test]
    fn detects_pagination_markers() {
        assert!(is_pagination_marker("Page 3"));
        assert!(is_pagination_marker("page 3 of 12"));
        assert!(!is_pagination_marker("Page 3 summary"));
        assert!(!is_pagination_marker("800001"));
    }

    #[test]
    fn pre_filter_drops_markers_and_header_repeats() {
        let lines = vec![
            Line::new(0, 0, "800001"),
            Line::new(0, 1, "Page 1 of 2"),
            Line::new(1, 0, "ROLL NO"),
            Line::new(1, 1, "800002"),
        ];
        let (kept, dropped) = pre_filter(&lines, &header());
        assert_eq!(dropped, 2);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].text, "800001");
        assert_eq!(kept[1].text, "800002");
    }

    #[test]
    fn header_echo_records_are_removed() {
        let raw = vec![
            Record::from_text(["ROLL NO", "NAME", "MARKS"]),
            Record::from_text(["800001", "A KUMAR", "85.0"]),
        ];
        let (set, dropped) = normalize_records(raw, &header(), &ExtractOptions::default());
        assert_eq!(set.len(), 1);
        assert_eq!(dropped, 1);
    }

    #[test]
    fn cells_are_trimmed_and_optionally_uppercased() {
        let raw = vec![Record::from_text(["  800001 ", "a kumar", "85.0"])];
        let options = ExtractOptions {
            uppercase_cells: true,
            uppercase_fields: true,
            ..ExtractOptions::default()
        };
        let (set, _) = normalize_records(raw, &header(), &options);
        let cells = set.records[0].cells();
        assert_eq!(cells[0].as_str(), Some("800001"));
        assert_eq!(cells[1].as_str(), Some("A KUMAR"));
        assert_eq!(set.header.fields(), &["ROLL NO", "NAME", "MARKS"]);
    }

    #[test]
    fn numeric_fields_coerce_with_missing_sentinel() {
        let raw = vec![
            Record::from_text(["800001", "A KUMAR", "85.0"]),
            Record::from_text(["800002", "B SINGH", "ABSENT"]),
        ];
        let options = ExtractOptions {
            numeric_fields: BTreeSet::from(["marks".to_owned()]),
            ..ExtractOptions::default()
        };
        let (set, _) = normalize_records(raw, &header(), &options);
        assert_eq!(set.records[0].cells()[2], CellValue::Number(85.0));
        assert!(set.records[1].cells()[2].is_missing());
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = vec![
            Record::from_text(["  800001 ", "a kumar", "85.0"]),
            Record::from_text(["800002", "B SINGH", "n/a"]),
        ];
        let options = ExtractOptions {
            uppercase_cells: true,
            uppercase_fields: true,
            numeric_fields: BTreeSet::from(["MARKS".to_owned()]),
            ..ExtractOptions::default()
        };
        let (once, _) = normalize_records(raw, &header(), &options);
        let (twice, dropped) =
            normalize_records(once.records.clone(), &once.header, &options);
        assert_eq!(once, twice);
        assert_eq!(dropped, 0);
    }
}
