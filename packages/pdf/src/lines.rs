//! Page text to line-sequence conversion.

use std::sync::Arc;

use rollcheck_table_models::Line;

use crate::progress::ProgressCallback;

/// Converts one page's extracted text into trimmed, non-empty [`Line`]s in
/// reading order, with per-page ordinals.
#[must_use]
pub fn page_lines(page: u32, text: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut ordinal = 0u32;

    for raw in text.lines() {
        if raw.trim().is_empty() {
            continue;
        }
        lines.push(Line::new(page, ordinal, raw));
        ordinal += 1;
    }

    lines
}

/// Converts a document's per-page texts into a single line sequence in
/// page-major order, reporting one unit of progress per page.
#[must_use]
pub fn document_lines(pages: &[String], progress: &Arc<dyn ProgressCallback>) -> Vec<Line> {
    progress.set_total(pages.len() as u64);

    let mut lines = Vec::new();
    for (i, text) in pages.iter().enumerate() {
        lines.extend(page_lines(u32::try_from(i).unwrap_or(u32::MAX), text));
        progress.inc(1);
    }

    progress.finish(format!(
        "Read {} page(s), {} non-empty line(s)",
        pages.len(),
        lines.len()
    ));

    lines
}

#[cfg(test)]
mod tests {
    use crate::progress::null_progress;

    use super::*;

    #[test]
    fn skips_blank_lines_and_trims() {
        let lines = page_lines(0, "  ROLL NO   NAME  \n\n   \n800001   A KUMAR\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "ROLL NO   NAME");
        assert_eq!(lines[0].ordinal, 0);
        assert_eq!(lines[1].text, "800001   A KUMAR");
        assert_eq!(lines[1].ordinal, 1);
    }

    #[test]
    fn document_lines_preserve_page_order() {
        let pages = vec!["a\nb".to_owned(), "c".to_owned()];
        let lines = document_lines(&pages, &null_progress());
        assert_eq!(lines.len(), 3);
        assert_eq!((lines[0].page, lines[0].ordinal), (0, 0));
        assert_eq!((lines[2].page, lines[2].ordinal), (1, 0));
        assert_eq!(lines[2].text, "c");
    }
}
