//! Regex-anchored row reconstruction with a carried rank field.
//!
//! Models merit lists where a logical row spans several physical lines and
//! the rank is printed only on the first one. A primary pattern matches a
//! complete row and records its rank; a secondary pattern matches a
//! continuation row missing only the leading rank, which is then filled
//! from the last primary match. Lines matching neither pattern are dropped.

use regex::Regex;
use std::sync::LazyLock;

use rollcheck_table_models::{Line, Record};

use crate::ExtractError;

/// Matches a number written with a colon in place of the decimal point, an
/// artifact of low-quality text recognition (`90:0` for `90.0`).
static COLON_DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+:\d+$").expect("valid regex"));

/// Rewrites a colon-decimal cell to use a period. Other values pass
/// through untouched.
fn repair_decimal(value: &str) -> String {
    if COLON_DECIMAL_RE.is_match(value) {
        value.replace(':', ".")
    } else {
        value.to_owned()
    }
}

/// Reconstructs rows by matching each line against a primary pattern
/// (complete row) or a secondary pattern (row missing the leading rank).
///
/// The carried rank is owned by this iterator and lives only for one
/// document's reconstruction; concurrent extractions each get their own.
#[derive(Debug)]
pub struct AnchoredRows<'a> {
    lines: std::slice::Iter<'a, Line>,
    primary: Regex,
    secondary: Regex,
    last_rank: Option<String>,
    dropped: usize,
}

impl<'a> AnchoredRows<'a> {
    /// Compiles both patterns and validates their capture-group counts
    /// against the header width: the primary must capture exactly `width`
    /// groups, the secondary exactly `width - 1`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Regex`] if a pattern fails to compile, or
    /// [`ExtractError::PatternWidth`] on a group-count mismatch.
    pub fn new(
        lines: &'a [Line],
        width: usize,
        primary: &str,
        secondary: &str,
    ) -> Result<Self, ExtractError> {
        let primary = Regex::new(primary)?;
        let secondary = Regex::new(secondary)?;

        // captures_len includes the implicit whole-match group.
        let primary_groups = primary.captures_len() - 1;
        if primary_groups != width {
            return Err(ExtractError::PatternWidth {
                role: "primary",
                expected: width,
                found: primary_groups,
            });
        }
        let secondary_groups = secondary.captures_len() - 1;
        if secondary_groups + 1 != width {
            return Err(ExtractError::PatternWidth {
                role: "secondary",
                expected: width.saturating_sub(1),
                found: secondary_groups,
            });
        }

        Ok(Self {
            lines: lines.iter(),
            primary,
            secondary,
            last_rank: None,
            dropped: 0,
        })
    }

    /// Number of lines matching neither pattern so far (complete once
    /// exhausted).
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.dropped
    }
}

impl Iterator for AnchoredRows<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        for line in self.lines.by_ref() {
            if let Some(caps) = self.primary.captures(&line.text) {
                let cells: Vec<String> = (1..caps.len())
                    .map(|i| {
                        repair_decimal(caps.get(i).map(|m| m.as_str().trim()).unwrap_or_default())
                    })
                    .collect();
                self.last_rank = cells.first().cloned();
                return Some(Record::from_text(cells));
            }

            if let Some(caps) = self.secondary.captures(&line.text) {
                if let Some(rank) = self.last_rank.clone() {
                    let mut cells = vec![rank];
                    cells.extend((1..caps.len()).map(|i| {
                        repair_decimal(caps.get(i).map(|m| m.as_str().trim()).unwrap_or_default())
                    }));
                    return Some(Record::from_text(cells));
                }
                // Continuation row before any complete row: no rank to
                // carry, so the line is unusable.
                self.dropped += 1;
                continue;
            }

            self.dropped += 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIMARY: &str = r"^(\d+)\s+(\S+)\s+(\d{6})\s+(\S+)\s+(\S+)$";
    const SECONDARY: &str = r"^(REG\S*)\s+(\d{6})\s+(\S+)\s+(\S+)$";

    fn lines(texts: &[&str]) -> Vec<Line> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Line::new(0, u32::try_from(i).unwrap(), t))
            .collect()
    }

    fn texts(record: &Record) -> Vec<&str> {
        record
            .cells()
            .iter()
            .map(|c| c.as_str().unwrap())
            .collect()
    }

    #[test]
    fn carries_rank_onto_secondary_rows() {
        let input = lines(&[
            "1 REG01 800001 GEN 85.0",
            "REG02 800002 OBC 90:0",
        ]);
        let mut rows = AnchoredRows::new(&input, 5, PRIMARY, SECONDARY).unwrap();
        let records: Vec<Record> = rows.by_ref().collect();

        assert_eq!(records.len(), 2);
        assert_eq!(texts(&records[0]), vec!["1", "REG01", "800001", "GEN", "85.0"]);
        // The second row reuses rank "1" and its colon-decimal marks are
        // repaired.
        assert_eq!(texts(&records[1]), vec!["1", "REG02", "800002", "OBC", "90.0"]);
        assert_eq!(rows.dropped(), 0);
    }

    #[test]
    fn secondary_row_before_any_primary_is_dropped() {
        let input = lines(&["REG02 800002 OBC 90.0", "1 REG01 800001 GEN 85.0"]);
        let mut rows = AnchoredRows::new(&input, 5, PRIMARY, SECONDARY).unwrap();
        let records: Vec<Record> = rows.by_ref().collect();
        assert_eq!(records.len(), 1);
        assert_eq!(rows.dropped(), 1);
    }

    #[test]
    fn unmatched_lines_are_dropped() {
        let input = lines(&[
            "MERIT LIST ROUND 2",
            "1 REG01 800001 GEN 85.0",
            "Page 1 of 3",
        ]);
        let mut rows = AnchoredRows::new(&input, 5, PRIMARY, SECONDARY).unwrap();
        let records: Vec<Record> = rows.by_ref().collect();
        assert_eq!(records.len(), 1);
        assert_eq!(rows.dropped(), 2);
    }

    #[test]
    fn rank_updates_on_each_primary_match() {
        let input = lines(&[
            "1 REG01 800001 GEN 85.0",
            "2 REG03 800003 GEN 80.0",
            "REG04 800004 SC 75.0",
        ]);
        let records: Vec<Record> = AnchoredRows::new(&input, 5, PRIMARY, SECONDARY)
            .unwrap()
            .collect();
        assert_eq!(texts(&records[2])[0], "2");
    }

    #[test]
    fn rejects_primary_pattern_of_wrong_width() {
        let input = lines(&[]);
        let err = AnchoredRows::new(&input, 4, PRIMARY, SECONDARY).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::PatternWidth {
                role: "primary",
                expected: 4,
                found: 5,
            }
        ));
    }

    #[test]
    fn rejects_invalid_pattern() {
        let input = lines(&[]);
        assert!(matches!(
            AnchoredRows::new(&input, 5, r"([unclosed", SECONDARY),
            Err(ExtractError::Regex(_))
        ));
    }

    #[test]
    fn repairs_only_colon_decimals() {
        assert_eq!(repair_decimal("90:0"), "90.0");
        assert_eq!(repair_decimal("10:30:00"), "10:30:00");
        assert_eq!(repair_decimal("GEN"), "GEN");
        assert_eq!(repair_decimal("85.0"), "85.0");
    }
}
