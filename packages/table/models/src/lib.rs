#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Data model and configuration types for tabular reconstruction.
//!
//! Text extracted from allotment and merit-list PDFs arrives as bare lines;
//! the types here describe what the reconstruction pipeline turns those
//! lines into: a [`HeaderSpec`] naming the columns, [`Record`]s positionally
//! aligned to it, and a [`RecordSet`] collecting them in document order.
//! Configuration enums select the header-detection policy and the row
//! reconstruction strategy per document shape.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A single trimmed, non-empty line of text with its position in the
/// document.
///
/// Immutable once produced by a line source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// Zero-indexed page the line came from.
    pub page: u32,
    /// Zero-indexed position of the line within its page.
    pub ordinal: u32,
    /// The trimmed text content.
    pub text: String,
}

impl Line {
    /// Creates a line, trimming the text.
    #[must_use]
    pub fn new(page: u32, ordinal: u32, text: &str) -> Self {
        Self {
            page,
            ordinal,
            text: text.trim().to_owned(),
        }
    }
}

/// An ordered list of field names defining a document's tabular shape.
///
/// Field names are unique by position, not necessarily by value. The field
/// count is fixed for the remainder of a document's extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderSpec {
    fields: Vec<String>,
}

impl HeaderSpec {
    /// Creates a header spec from field names.
    #[must_use]
    pub const fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// The number of fields (the width every record must have).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the spec has zero usable fields.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The ordered field names.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Position of the first field with this exact name, if any.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }

    /// Returns a copy with every field name uppercased.
    #[must_use]
    pub fn uppercased(&self) -> Self {
        Self {
            fields: self.fields.iter().map(|f| f.to_uppercase()).collect(),
        }
    }
}

/// One cell of a reconstructed record.
///
/// Cells start life as [`CellValue::Text`]. Fields designated numeric are
/// coerced to [`CellValue::Number`] during normalization; a failed coercion
/// yields [`CellValue::Missing`] rather than aborting the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// An uncoerced text value.
    Text(String),
    /// A successfully coerced numeric value.
    Number(f64),
    /// A designated-numeric cell whose value did not parse.
    Missing,
}

impl CellValue {
    /// The text content, if this is a text cell.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) | Self::Missing => None,
        }
    }

    /// Whether this cell is the missing-value sentinel.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Missing => Ok(()),
        }
    }
}

/// One reconstructed row, positionally aligned to a [`HeaderSpec`].
///
/// Invariant: a record holds exactly as many cells as its header spec has
/// fields, in the same order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    cells: Vec<CellValue>,
}

impl Record {
    /// Creates a record from cell values.
    #[must_use]
    pub const fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// Creates a record of text cells from strings.
    #[must_use]
    pub fn from_text<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self {
            cells: values
                .into_iter()
                .map(|v| CellValue::Text(v.into()))
                .collect(),
        }
    }

    /// The cells in header order.
    #[must_use]
    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    /// Mutable access for normalization passes.
    pub fn cells_mut(&mut self) -> &mut Vec<CellValue> {
        &mut self.cells
    }

    /// The cell under the named field, resolved through the header spec.
    #[must_use]
    pub fn get<'a>(&'a self, header: &HeaderSpec, field: &str) -> Option<&'a CellValue> {
        self.cells.get(header.position(field)?)
    }
}

/// An ordered sequence of records sharing one [`HeaderSpec`].
///
/// Insertion order is document order; records are not sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    /// The shared header spec.
    pub header: HeaderSpec,
    /// The records, in document order.
    pub records: Vec<Record>,
}

impl RecordSet {
    /// Creates an empty record set for the given header.
    #[must_use]
    pub const fn new(header: HeaderSpec) -> Self {
        Self {
            header,
            records: Vec::new(),
        }
    }

    /// Number of records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no rows were detected.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends a record. Callers must have aligned it to `self.header`.
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }
}

/// How the header line(s) of a document are located.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "camelCase")]
pub enum HeaderPolicy {
    /// The first line containing at least `min_matches` case-insensitive
    /// hits from the table-role keyword vocabulary is the header; field
    /// names come from splitting it on runs of two or more spaces.
    Keyword {
        /// Minimum keyword hits for a line to qualify.
        min_matches: usize,
    },
    /// The first `lines` lines of the document are taken verbatim as field
    /// names, one per line, with no keyword requirement.
    FixedCount {
        /// How many leading lines form the header.
        lines: usize,
    },
}

impl Default for HeaderPolicy {
    fn default() -> Self {
        Self::Keyword {
            min_matches: DEFAULT_KEYWORD_MIN_MATCHES,
        }
    }
}

/// Default minimum keyword hits under [`HeaderPolicy::Keyword`].
pub const DEFAULT_KEYWORD_MIN_MATCHES: usize = 3;

/// Default header line count under [`HeaderPolicy::FixedCount`].
pub const DEFAULT_FIXED_HEADER_LINES: usize = 5;

/// What to do with tokens beyond the header width under
/// [`RowStrategy::DelimiterSplit`].
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "kebab-case")]
pub enum ExtraTokenPolicy {
    /// Keep the first N tokens and drop the rest.
    #[default]
    Truncate,
    /// Join the surplus tokens into the final column with single spaces.
    MergeIntoLast,
}

/// How data lines are reconstructed into rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "camelCase")]
pub enum RowStrategy {
    /// Each line splits on runs of two or more whitespace characters into
    /// one row. Lines yielding fewer tokens than the header width are
    /// dropped.
    DelimiterSplit {
        /// Policy for tokens beyond the header width.
        extra_tokens: ExtraTokenPolicy,
    },
    /// Lines are consumed N at a time, one field per physical line.
    FixedGrouping,
    /// A primary pattern matches complete rows; a secondary pattern matches
    /// rows missing only the leading rank field, which is filled from the
    /// last primary match.
    RegexAnchored {
        /// Pattern for a complete row; must capture exactly N groups.
        primary: String,
        /// Pattern for a rank-less row; must capture exactly N - 1 groups.
        secondary: String,
    },
}

impl Default for RowStrategy {
    fn default() -> Self {
        Self::DelimiterSplit {
            extra_tokens: ExtraTokenPolicy::default(),
        }
    }
}

/// How records are matched against the caller's identifier list.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "kebab-case")]
pub enum IdentifierMode {
    /// Exact equality against the first identifier-bearing field.
    #[default]
    FirstMatch,
    /// Exact equality against every identifier-bearing field, unioned.
    Union,
    /// Substring containment against every field of every record. The
    /// fallback when no field name suggests an identifier.
    SubstringAnywhere,
}

/// Full configuration for one document's extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractOptions {
    /// How to locate the header.
    pub header_policy: HeaderPolicy,
    /// How to reconstruct rows.
    pub row_strategy: RowStrategy,
    /// Uppercase every cell value during normalization.
    pub uppercase_cells: bool,
    /// Uppercase every field name during normalization.
    pub uppercase_fields: bool,
    /// Field names whose cells are coerced to numbers.
    pub numeric_fields: BTreeSet<String>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn line_trims_text() {
        let line = Line::new(0, 3, "  800001  GEN  ");
        assert_eq!(line.text, "800001  GEN");
    }

    #[test]
    fn header_position_finds_first_occurrence() {
        let header = HeaderSpec::new(vec!["ROLL NO".into(), "NAME".into(), "ROLL NO".into()]);
        assert_eq!(header.position("ROLL NO"), Some(0));
        assert_eq!(header.position("MARKS"), None);
    }

    #[test]
    fn record_get_resolves_through_header() {
        let header = HeaderSpec::new(vec!["ROLL NO".into(), "NAME".into()]);
        let record = Record::from_text(["800001", "A KUMAR"]);
        assert_eq!(
            record.get(&header, "NAME").and_then(CellValue::as_str),
            Some("A KUMAR")
        );
        assert!(record.get(&header, "MARKS").is_none());
    }

    #[test]
    fn cell_display_renders_missing_as_empty() {
        assert_eq!(CellValue::Missing.to_string(), "");
        assert_eq!(CellValue::Number(85.5).to_string(), "85.5");
        assert_eq!(CellValue::Text("GEN".into()).to_string(), "GEN");
    }

    #[test]
    fn identifier_mode_round_trips_kebab_case() {
        assert_eq!(IdentifierMode::FirstMatch.to_string(), "first-match");
        assert_eq!(
            IdentifierMode::from_str("substring-anywhere").unwrap(),
            IdentifierMode::SubstringAnywhere
        );
    }

    #[test]
    fn default_options_use_keyword_policy() {
        let options = ExtractOptions::default();
        assert_eq!(
            options.header_policy,
            HeaderPolicy::Keyword { min_matches: 3 }
        );
        assert_eq!(
            options.row_strategy,
            RowStrategy::DelimiterSplit {
                extra_tokens: ExtraTokenPolicy::Truncate
            }
        );
    }
}
