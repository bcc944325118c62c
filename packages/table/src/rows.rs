//! Delimiter-split and fixed-grouping row reconstruction.
//!
//! Both reconstructors are lazy iterators over a borrowed line slice, pure
//! functions of their inputs. Malformed lines are dropped, never raised;
//! [`DelimiterRows::dropped`] and [`GroupedRows::dropped`] report the
//! aggregate count once the iterator is exhausted.

use rollcheck_table_models::{ExtraTokenPolicy, Line, Record};

use crate::header::split_columns;

/// Reconstructs one row per line by splitting on runs of two or more
/// whitespace characters.
///
/// Lines splitting into fewer tokens than the header width are dropped.
/// Surplus tokens are truncated or merged into the last column per
/// [`ExtraTokenPolicy`].
#[derive(Debug)]
pub struct DelimiterRows<'a> {
    lines: std::slice::Iter<'a, Line>,
    width: usize,
    extra_tokens: ExtraTokenPolicy,
    dropped: usize,
}

impl<'a> DelimiterRows<'a> {
    /// Creates a reconstructor over `lines` for a header of `width` fields.
    #[must_use]
    pub fn new(lines: &'a [Line], width: usize, extra_tokens: ExtraTokenPolicy) -> Self {
        Self {
            lines: lines.iter(),
            width,
            extra_tokens,
            dropped: 0,
        }
    }

    /// Number of lines dropped so far (complete once exhausted).
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.dropped
    }
}

impl Iterator for DelimiterRows<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        if self.width == 0 {
            return None;
        }
        for line in self.lines.by_ref() {
            let mut tokens = split_columns(&line.text);
            if tokens.len() < self.width {
                self.dropped += 1;
                continue;
            }
            if tokens.len() > self.width {
                match self.extra_tokens {
                    ExtraTokenPolicy::Truncate => tokens.truncate(self.width),
                    ExtraTokenPolicy::MergeIntoLast => {
                        let merged = tokens.split_off(self.width - 1).join(" ");
                        tokens.push(merged);
                    }
                }
            }
            return Some(Record::from_text(tokens));
        }
        None
    }
}

/// Reconstructs rows by consuming lines `width` at a time, one field per
/// physical line.
///
/// Assumes each logical field occupies exactly one line; wrapped or
/// multi-line fields shift every subsequent row by one position. A trailing
/// partial group is dropped.
#[derive(Debug)]
pub struct GroupedRows<'a> {
    lines: &'a [Line],
    width: usize,
    pos: usize,
}

impl<'a> GroupedRows<'a> {
    /// Creates a reconstructor over `lines` for a header of `width` fields.
    #[must_use]
    pub const fn new(lines: &'a [Line], width: usize) -> Self {
        Self {
            lines,
            width,
            pos: 0,
        }
    }

    /// Number of trailing lines that did not fill a complete group
    /// (complete once exhausted).
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.lines.len() - self.pos
    }
}

impl Iterator for GroupedRows<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        if self.width == 0 || self.pos + self.width > self.lines.len() {
            return None;
        }
        let group = &self.lines[self.pos..self.pos + self.width];
        self.pos += self.width;
        Some(Record::from_text(group.iter().map(|l| l.text.clone())))
    }
}

#[cfg(test)]
mod tests {
    use rollcheck_table_models::CellValue;

    use super::*;

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
    fn exact_width_lines_all_become_rows() {
        let input = lines(&["800001   A KUMAR   GEN", "800002   B SINGH   OBC"]);
        let mut rows = DelimiterRows::new(&input, 3, ExtraTokenPolicy::Truncate);
        let records: Vec<Record> = rows.by_ref().collect();
        assert_eq!(records.len(), input.len());
        assert_eq!(texts(&records[0]), vec!["800001", "A KUMAR", "GEN"]);
        assert_eq!(texts(&records[1]), vec!["800002", "B SINGH", "OBC"]);
        assert_eq!(rows.dropped(), 0);
    }

    #[test]
    fn short_lines_are_dropped_silently() {
        let input = lines(&["800001   A KUMAR   GEN", "Page total", "800002   B SINGH   OBC"]);
        let mut rows = DelimiterRows::new(&input, 3, ExtraTokenPolicy::Truncate);
        let records: Vec<Record> = rows.by_ref().collect();
        assert_eq!(records.len(), 2);
        assert_eq!(rows.dropped(), 1);
    }

    #[test]
    fn extra_tokens_truncate_by_default() {
        let input = lines(&["800001   A KUMAR   GEN   EXTRA   TOKENS"]);
        let records: Vec<Record> =
            DelimiterRows::new(&input, 3, ExtraTokenPolicy::Truncate).collect();
        assert_eq!(texts(&records[0]), vec!["800001", "A KUMAR", "GEN"]);
    }

    #[test]
    fn extra_tokens_can_merge_into_last_column() {
        let input = lines(&["800001   A KUMAR   GOVT COLLEGE   OF   ENGINEERING"]);
        let records: Vec<Record> =
            DelimiterRows::new(&input, 3, ExtraTokenPolicy::MergeIntoLast).collect();
        assert_eq!(
            texts(&records[0]),
            vec!["800001", "A KUMAR", "GOVT COLLEGE OF ENGINEERING"]
        );
    }

    #[test]
    fn grouping_consumes_lines_n_at_a_time() {
        let input = lines(&["1", "800001", "GEN", "2", "800002", "OBC"]);
        let mut rows = GroupedRows::new(&input, 3);
        let records: Vec<Record> = rows.by_ref().collect();
        assert_eq!(records.len(), 2);
        assert_eq!(texts(&records[0]), vec!["1", "800001", "GEN"]);
        assert_eq!(texts(&records[1]), vec!["2", "800002", "OBC"]);
        assert_eq!(rows.dropped(), 0);
    }

    #[test]
    fn grouping_drops_trailing_partial_group() {
        let input = lines(&["1", "800001", "GEN", "2", "800002"]);
        let mut rows = GroupedRows::new(&input, 3);
        let records: Vec<Record> = rows.by_ref().collect();
        assert_eq!(records.len(), input.len() / 3);
        assert_eq!(rows.dropped(), 2);
    }

    #[test]
    fn grouping_concatenation_reproduces_data_lines() {
        let input = lines(&["1", "800001", "GEN", "2", "800002", "OBC", "tail"]);
        let records: Vec<Record> = GroupedRows::new(&input, 3).collect();
        let flattened: Vec<String> = records
            .iter()
            .flat_map(Record::cells)
            .map(CellValue::to_string)
            .collect();
        let expected: Vec<String> = input[..6].iter().map(|l| l.text.clone()).collect();
        assert_eq!(flattened, expected);
    }
}
