#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Identifier matching over reconstructed record sets.
//!
//! Given a list of roll/application/registration numbers pasted by the
//! caller, selects the identifier-bearing field(s) of a [`RecordSet`] by
//! name and returns the records whose identifiers appear in the list.
//! When no field name suggests an identifier, [`find_matches_with_fallback`]
//! degrades to a whole-row substring scan instead of failing.

use std::borrow::Cow;
use std::collections::BTreeSet;

use rollcheck_table_models::{CellValue, HeaderSpec, IdentifierMode, Record, RecordSet};

/// Field-name substrings that mark a field as identifier-bearing.
const IDENTIFIER_KEYWORDS: &[&str] = &["roll", "application", "registration", "reg", "id"];

/// Errors specific to matching.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// No field name contains an identifier keyword, so first-match and
    /// union modes have nothing to compare against.
    #[error("no identifier column found (looked for {})", IDENTIFIER_KEYWORDS.join(", "))]
    NoIdentifierColumn,
}

/// A deduplicated set of caller-supplied identifier strings.
///
/// Entries are trimmed of surrounding whitespace; empty entries are
/// discarded. Order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    values: BTreeSet<String>,
}

impl Query {
    /// Builds a query from raw identifier strings (one per logical
    /// identifier, e.g. lines of a pasted list).
    #[must_use]
    pub fn new<S: AsRef<str>>(values: impl IntoIterator<Item = S>) -> Self {
        Self {
            values: values
                .into_iter()
                .filter_map(|v| {
                    let trimmed = v.as_ref().trim();
                    (!trimmed.is_empty()).then(|| trimmed.to_owned())
                })
                .collect(),
        }
    }

    /// Returns a copy with every value uppercased, for matching against a
    /// case-normalized record set.
    #[must_use]
    pub fn uppercased(&self) -> Self {
        Self {
            values: self.values.iter().map(|v| v.to_uppercase()).collect(),
        }
    }

    /// Number of distinct identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the query is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn contains(&self, value: &str) -> bool {
        self.values.contains(value)
    }

    fn any_substring_of(&self, haystack: &str) -> bool {
        !haystack.is_empty() && self.values.iter().any(|v| haystack.contains(v.as_str()))
    }
}

/// The records whose identifier field(s) intersect the query, in record-set
/// order, plus the mode that actually produced them (which differs from the
/// requested mode after a fallback).
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// The matching records, sharing the source header spec.
    pub records: RecordSet,
    /// The identifier mode that produced the result.
    pub mode: IdentifierMode,
}

/// Positions of the identifier-bearing fields, in header order.
#[must_use]
pub fn identifier_fields(header: &HeaderSpec) -> Vec<usize> {
    header
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, field)| {
            let lower = field.to_lowercase();
            IDENTIFIER_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .map(|(i, _)| i)
        .collect()
}

/// The comparable string form of a cell: text as-is, numbers formatted,
/// missing as empty.
fn cell_str(cell: &CellValue) -> Cow<'_, str> {
    match cell {
        CellValue::Text(s) => Cow::Borrowed(s.as_str()),
        CellValue::Number(n) => Cow::Owned(n.to_string()),
        CellValue::Missing => Cow::Borrowed(""),
    }
}

fn record_matches(record: &Record, query: &Query, columns: &[usize], mode: IdentifierMode) -> bool {
    match mode {
        IdentifierMode::FirstMatch | IdentifierMode::Union => columns.iter().any(|&col| {
            record
                .cells()
                .get(col)
                .is_some_and(|cell| query.contains(&cell_str(cell)))
        }),
        IdentifierMode::SubstringAnywhere => record
            .cells()
            .iter()
            .any(|cell| query.any_substring_of(&cell_str(cell))),
    }
}

/// Selects the identifier field(s) for `mode` and returns the matching
/// records, preserving record-set order with no duplicates.
///
/// # Errors
///
/// Returns [`MatchError::NoIdentifierColumn`] under first-match or union
/// mode when no field name contains an identifier keyword.
pub fn find_matches(
    set: &RecordSet,
    query: &Query,
    mode: IdentifierMode,
) -> Result<MatchResult, MatchError> {
    let columns: Vec<usize> = match mode {
        IdentifierMode::FirstMatch => {
            let eligible = identifier_fields(&set.header);
            let first = eligible.first().ok_or(MatchError::NoIdentifierColumn)?;
            vec![*first]
        }
        IdentifierMode::Union => {
            let eligible = identifier_fields(&set.header);
            if eligible.is_empty() {
                return Err(MatchError::NoIdentifierColumn);
            }
            eligible
        }
        IdentifierMode::SubstringAnywhere => Vec::new(),
    };

    // Each record is tested once, so union mode cannot produce duplicates
    // even when several identifier fields hold the same value.
    let mut result = RecordSet::new(set.header.clone());
    for record in &set.records {
        if record_matches(record, query, &columns, mode) {
            result.push(record.clone());
        }
    }

    log::debug!(
        "Matched {} of {} record(s) under {mode} mode",
        result.len(),
        set.len()
    );

    Ok(MatchResult {
        records: result,
        mode,
    })
}

/// Like [`find_matches`], but degrades to [`IdentifierMode::SubstringAnywhere`]
/// with a warning when no identifier column exists under the requested mode.
#[must_use]
pub fn find_matches_with_fallback(
    set: &RecordSet,
    query: &Query,
    mode: IdentifierMode,
) -> MatchResult {
    match find_matches(set, query, mode) {
        Ok(result) => result,
        Err(MatchError::NoIdentifierColumn) => {
            log::warn!(
                "No identifier column among {:?}; falling back to whole-row substring scan",
                set.header.fields()
            );
            // SubstringAnywhere needs no identifier column, so this cannot
            // recurse further.
            find_matches(set, query, IdentifierMode::SubstringAnywhere)
                .unwrap_or_else(|_| MatchResult {
                    records: RecordSet::new(set.header.clone()),
                    mode: IdentifierMode::SubstringAnywhere,
                })
        }
    }
}
