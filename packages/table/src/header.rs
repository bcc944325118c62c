//! Header detection heuristics.
//!
//! Allotment PDFs emit their column headers in one of two shapes: a single
//! space-aligned line (`ROLL NO   NAME   CATEGORY`) or one field name per
//! line at the top of the document. [`detect`] handles both behind
//! [`HeaderPolicy`]; [`detect_auto`] chains policies and takes the first
//! hit.

use regex::Regex;
use std::sync::LazyLock;

use rollcheck_table_models::{HeaderPolicy, HeaderSpec, Line};

use crate::ExtractError;

/// Vocabulary of table-role keywords a header line is expected to contain.
const HEADER_KEYWORDS: &[&str] = &[
    "roll",
    "application",
    "registration",
    "category",
    "marks",
    "merit",
    "seat",
    "institute",
    "remarks",
    "rank",
    "name",
];

/// Regex splitting a header or data line into columns at runs of two or
/// more whitespace characters. Single spaces stay inside a column, so
/// multi-word field names like `ROLL NO` survive the split.
pub(crate) static COLUMN_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("valid regex"));

/// A located header and the index where data lines begin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedHeader {
    /// The ordered field names.
    pub header: HeaderSpec,
    /// Index into the line sequence of the first data line.
    pub data_start: usize,
}

/// Splits a line into column tokens on runs of two or more whitespace
/// characters, dropping empty tokens.
#[must_use]
pub fn split_columns(text: &str) -> Vec<String> {
    COLUMN_SPLIT_RE
        .split(text)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Counts how many vocabulary keywords appear in the line,
/// case-insensitively. Each keyword counts once no matter how often it
/// occurs.
fn keyword_hits(text: &str) -> usize {
    let lower = text.to_lowercase();
    HEADER_KEYWORDS.iter().filter(|k| lower.contains(*k)).count()
}

/// Locates the header under the given policy.
///
/// Under [`HeaderPolicy::Keyword`], scans for the first line with at least
/// `min_matches` keyword hits whose column split yields at least one field
/// name; lines that qualify by keywords but split to nothing are skipped
/// and the scan continues. Under [`HeaderPolicy::FixedCount`], the first
/// `lines` lines are taken verbatim as field names, one per line.
///
/// # Errors
///
/// Returns [`ExtractError::HeaderNotFound`] if no line qualifies, if the
/// input is empty, or if fewer lines exist than a fixed-count policy
/// requires.
pub fn detect(lines: &[Line], policy: &HeaderPolicy) -> Result<DetectedHeader, ExtractError> {
    match policy {
        HeaderPolicy::Keyword { min_matches } => {
            for (idx, line) in lines.iter().enumerate() {
                if keyword_hits(&line.text) < *min_matches {
                    continue;
                }
                let fields = split_columns(&line.text);
                if fields.is_empty() {
                    continue;
                }
                log::debug!(
                    "Header detected on page {} line {}: {:?}",
                    line.page,
                    line.ordinal,
                    fields
                );
                return Ok(DetectedHeader {
                    header: HeaderSpec::new(fields),
                    data_start: idx + 1,
                });
            }
            Err(ExtractError::HeaderNotFound)
        }
        HeaderPolicy::FixedCount { lines: count } => {
            if *count == 0 || lines.len() < *count {
                return Err(ExtractError::HeaderNotFound);
            }
            let fields: Vec<String> = lines[..*count].iter().map(|l| l.text.clone()).collect();
            Ok(DetectedHeader {
                header: HeaderSpec::new(fields),
                data_start: *count,
            })
        }
    }
}

/// Tries each policy in order and returns the first successful detection.
///
/// # Errors
///
/// Returns [`ExtractError::HeaderNotFound`] if every policy fails.
pub fn detect_auto(lines: &[Line], policies: &[HeaderPolicy]) -> Result<DetectedHeader, ExtractError> {
    for policy in policies {
        if let Ok(found) = detect(lines, policy) {
            return Ok(found);
        }
    }
    Err(ExtractError::HeaderNotFound)
}
