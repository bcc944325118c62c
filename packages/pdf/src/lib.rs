#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! PDF line source for the reconstruction pipeline.
//!
//! Allotment and merit lists are published as PDFs whose tables exist only
//! visually. This crate produces the pipeline's input: it loads a document
//! from disk or a URL, extracts its text page by page with [`pdf_extract`],
//! and turns each page into trimmed, non-empty
//! [`Line`](rollcheck_table_models::Line)s in reading order.
//!
//! Pages are independent of one another; [`document_lines`] merges them in
//! page order, which is all the downstream pipeline requires.

pub mod download;
pub mod lines;
pub mod progress;

pub use lines::{document_lines, page_lines};

/// Errors specific to loading and text-extracting PDF documents.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// An HTTP request to download a PDF failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// PDF text extraction failed.
    #[error("PDF extraction error: {0}")]
    Extraction(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Loads a document's raw bytes from a local path or an `http(s)` URL.
///
/// # Errors
///
/// Returns [`PdfError::Http`] for failed downloads and [`PdfError::Io`]
/// for unreadable paths.
pub async fn load_document(source: &str) -> Result<Vec<u8>, PdfError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        download::fetch_bytes(source).await
    } else {
        Ok(std::fs::read(source)?)
    }
}

/// Extracts the text of every page of a PDF, in page order.
///
/// # Errors
///
/// Returns [`PdfError::Extraction`] if the document cannot be parsed.
pub fn extract_page_texts(bytes: &[u8]) -> Result<Vec<String>, PdfError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| PdfError::Extraction(format!("failed to extract text from PDF: {e}")))?;

    log::debug!("Extracted text from {} page(s)", pages.len());

    Ok(pages)
}
