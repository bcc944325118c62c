#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Tabular reconstruction from unstructured text lines.
//!
//! Seat-allotment and merit-list PDFs lose their table structure during
//! text extraction; what remains is an ordered sequence of lines where the
//! layout survives only as spacing and line order. This crate turns those
//! lines back into `(header, rows)` pairs: [`header`] locates the column
//! names, [`rows`] and [`regex_rows`] reconstruct records under three
//! interchangeable strategies, and [`normalize`] cleans up pagination
//! artifacts and repeated headers.
//!
//! The primary entry point is [`extract_records`], which runs the whole
//! pipeline for one document under an
//! [`ExtractOptions`](rollcheck_table_models::ExtractOptions)
//! configuration. Extraction is best-effort: malformed lines are dropped
//! and only an aggregate count is reported; the sole hard failure is not
//! finding a header at all.

pub mod header;
pub mod normalize;
pub mod regex_rows;
pub mod rows;

use rollcheck_table_models::{ExtractOptions, Line, Record, RecordSet, RowStrategy};

/// Errors specific to table reconstruction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// No header line (or lines) could be identified; processing of the
    /// document halts with zero output.
    #[error("no header line identified")]
    HeaderNotFound,

    /// A configured row pattern failed to compile.
    #[error("invalid row pattern: {0}")]
    Regex(#[from] regex::Error),

    /// A row pattern captures the wrong number of groups for the header
    /// width.
    #[error("{role} pattern captures {found} group(s), expected {expected}")]
    PatternWidth {
        /// Which pattern is at fault (`"primary"` or `"secondary"`).
        role: &'static str,
        /// The group count the header width requires.
        expected: usize,
        /// The group count the pattern actually has.
        found: usize,
    },
}

/// The result of reconstructing one document.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// The normalized records, in document order. Empty when the header
    /// was found but no line reconstructed into a row.
    pub records: RecordSet,
    /// Aggregate count of lines and records dropped along the way
    /// (malformed lines, pagination markers, repeated headers, trailing
    /// partial groups). Individual drops are never surfaced.
    pub dropped_lines: usize,
}

/// Runs the full reconstruction pipeline over a document's line sequence:
/// header detection, pagination/header-repeat filtering, row
/// reconstruction under the configured strategy, and normalization.
///
/// Zero reconstructed records is a valid outcome, reported as an empty
/// [`RecordSet`] rather than an error.
///
/// # Errors
///
/// Returns [`ExtractError::HeaderNotFound`] if no header is identified,
/// or a pattern error when the regex-anchored strategy is misconfigured.
pub fn extract_records(
    lines: &[Line],
    options: &ExtractOptions,
) -> Result<Extraction, ExtractError> {
    let detected = header::detect(lines, &options.header_policy)?;
    let width = detected.header.len();
    let data = &lines[detected.data_start..];

    let (kept, filtered) = normalize::pre_filter(data, &detected.header);

    let (raw, unmatched) = reconstruct(&kept, width, &options.row_strategy)?;

    let (records, echoes) = normalize::normalize_records(raw, &detected.header, options);

    if records.is_empty() {
        log::warn!(
            "No rows detected: header {:?} matched none of {} data line(s)",
            records.header.fields(),
            data.len()
        );
    } else {
        log::debug!(
            "Reconstructed {} record(s) from {} data line(s)",
            records.len(),
            data.len()
        );
    }

    Ok(Extraction {
        records,
        dropped_lines: filtered + unmatched + echoes,
    })
}

/// Applies the selected reconstruction strategy, returning the raw records
/// and the count of lines the strategy dropped.
fn reconstruct(
    lines: &[Line],
    width: usize,
    strategy: &RowStrategy,
) -> Result<(Vec<Record>, usize), ExtractError> {
    match strategy {
        RowStrategy::DelimiterSplit { extra_tokens } => {
            let mut iter = rows::DelimiterRows::new(lines, width, *extra_tokens);
            let raw: Vec<Record> = iter.by_ref().collect();
            Ok((raw, iter.dropped()))
        }
        RowStrategy::FixedGrouping => {
            let mut iter = rows::GroupedRows::new(lines, width);
            let raw: Vec<Record> = iter.by_ref().collect();
            Ok((raw, iter.dropped()))
        }
        RowStrategy::RegexAnchored { primary, secondary } => {
            let mut iter = regex_rows::AnchoredRows::new(lines, width, primary, secondary)?;
            let raw: Vec<Record> = iter.by_ref().collect();
            Ok((raw, iter.dropped()))
        }
    }
}

#[cfg(test)]
mod tests {
    use rollcheck_table_models::{CellValue, HeaderPolicy};

    use super::*;

    fn doc(texts: &[(u32, &str)]) -> Vec<Line> {
        let mut lines = Vec::new();
        let mut ordinal = 0u32;
        let mut page = 0u32;
        for &(p, t) in texts {
            if p != page {
                page = p;
                ordinal = 0;
            }
            lines.push(Line::new(p, ordinal, t));
            ordinal += 1;
        }
        lines
    }

    #[test]
    fn delimiter_pipeline_reconstructs_every_conforming_line() {
        let lines = doc(&[
            (0, "ROLL NO   NAME   CATEGORY"),
            (0, "800001   A KUMAR   GEN"),
            (0, "800002   B SINGH   OBC"),
            (1, "Page 1 of 2"),
            (1, "ROLL NO   NAME   CATEGORY"),
            (1, "800003   C DEVI   SC"),
        ]);
        let options = ExtractOptions {
            header_policy: HeaderPolicy::Keyword { min_matches: 2 },
            ..ExtractOptions::default()
        };
        let extraction = extract_records(&lines, &options).unwrap();

        assert_eq!(extraction.records.len(), 3);
        assert_eq!(
            extraction.records.header.fields(),
            &["ROLL NO", "NAME", "CATEGORY"]
        );
        // The page marker and the repeated header line were dropped.
        assert_eq!(extraction.dropped_lines, 2);
    }

    #[test]
    fn field_order_matches_header_order() {
        let lines = doc(&[
            (0, "ROLL NO   NAME   CATEGORY"),
            (0, "800001   A KUMAR   GEN"),
        ]);
        let options = ExtractOptions {
            header_policy: HeaderPolicy::Keyword { min_matches: 2 },
            ..ExtractOptions::default()
        };
        let extraction = extract_records(&lines, &options).unwrap();
        let record = &extraction.records.records[0];
        assert_eq!(
            record
                .get(&extraction.records.header, "CATEGORY")
                .and_then(CellValue::as_str),
            Some("GEN")
        );
    }

    #[test]
    fn fixed_grouping_pipeline_counts() {
        let lines = doc(&[
            (0, "Rank"),
            (0, "Roll No"),
            (0, "Category"),
            (0, "1"),
            (0, "800001"),
            (0, "GEN"),
            (0, "2"),
            (0, "800002"),
            (0, "OBC"),
            (0, "3"),
        ]);
        let options = ExtractOptions {
            header_policy: HeaderPolicy::FixedCount { lines: 3 },
            row_strategy: RowStrategy::FixedGrouping,
            ..ExtractOptions::default()
        };
        let extraction = extract_records(&lines, &options).unwrap();
        // 7 data lines, width 3: floor(7 / 3) = 2 records, 1 trailing line.
        assert_eq!(extraction.records.len(), 2);
        assert_eq!(extraction.dropped_lines, 1);
    }

    #[test]
    fn regex_anchored_pipeline_with_carry() {
        let lines = doc(&[
            (0, "RANK   REGISTRATION NO   ROLL NO   CATEGORY   MARKS"),
            (0, "1 REG01 800001 GEN 85.0"),
            (0, "REG02 800002 OBC 90:0"),
        ]);
        let options = ExtractOptions {
            header_policy: HeaderPolicy::Keyword { min_matches: 3 },
            row_strategy: RowStrategy::RegexAnchored {
                primary: r"^(\d+)\s+(\S+)\s+(\d{6})\s+(\S+)\s+(\S+)$".to_owned(),
                secondary: r"^([A-Z]+\d+)\s+(\d{6})\s+(\S+)\s+(\S+)$".to_owned(),
            },
            ..ExtractOptions::default()
        };
        let extraction = extract_records(&lines, &options).unwrap();
        assert_eq!(extraction.records.len(), 2);
        let second = &extraction.records.records[1];
        assert_eq!(second.cells()[0].as_str(), Some("1"));
        assert_eq!(second.cells()[4].as_str(), Some("90.0"));
    }

    #[test]
    fn no_rows_detected_is_an_empty_result_not_an_error() {
        let lines = doc(&[
            (0, "ROLL NO   NAME   CATEGORY"),
            (0, "nothing tabular here"),
        ]);
        let options = ExtractOptions {
            header_policy: HeaderPolicy::Keyword { min_matches: 2 },
            ..ExtractOptions::default()
        };
        let extraction = extract_records(&lines, &options).unwrap();
        assert!(extraction.records.is_empty());
        assert_eq!(extraction.dropped_lines, 1);
    }

    #[test]
    fn missing_header_halts_the_document() {
        let lines = doc(&[(0, "no recognizable table")]);
        assert!(matches!(
            extract_records(&lines, &ExtractOptions::default()),
            Err(ExtractError::HeaderNotFound)
        ));
    }
}
