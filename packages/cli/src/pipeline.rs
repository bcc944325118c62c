//! Pipeline orchestration for the check and extract commands.
//!
//! Chains document loading, per-page text extraction, table
//! reconstruction, matching, and export, with an `indicatif` progress bar
//! over the page loop.

use std::io::Read as _;
use std::path::Path;

use rollcheck_cli_utils::{IndicatifProgress, MultiProgress};
use rollcheck_export::ExportFormat;
use rollcheck_match::{Query, find_matches_with_fallback};
use rollcheck_table::Extraction;
use rollcheck_table_models::{ExtractOptions, IdentifierMode};

/// Loads a PDF and reconstructs its table under the given options.
async fn extract(
    multi: &MultiProgress,
    pdf: &str,
    options: &ExtractOptions,
) -> Result<Extraction, Box<dyn std::error::Error>> {
    let bytes = rollcheck_pdf::load_document(pdf).await?;
    let pages = rollcheck_pdf::extract_page_texts(&bytes)?;

    let progress = IndicatifProgress::pages_bar(multi, "Reading pages");
    let lines = rollcheck_pdf::document_lines(&pages, &progress);

    let extraction = rollcheck_table::extract_records(&lines, options)?;

    log::info!(
        "Reconstructed {} record(s) with fields {:?} ({} line(s)/record(s) dropped)",
        extraction.records.len(),
        extraction.records.header.fields(),
        extraction.dropped_lines
    );

    Ok(extraction)
}

/// Reads the identifier list from a file, or stdin when `ids` is `"-"`.
fn read_query(ids: &str, uppercase: bool) -> Result<Query, Box<dyn std::error::Error>> {
    let content = if ids == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(ids)?
    };

    let query = Query::new(content.lines());
    Ok(if uppercase { query.uppercased() } else { query })
}

/// Runs the full check pipeline: extract, match, export the matches.
///
/// # Errors
///
/// Returns an error if the document cannot be loaded, no header is found,
/// or the output file cannot be written. An empty match set is not an
/// error.
pub async fn run_check(
    multi: &MultiProgress,
    pdf: &str,
    ids: &str,
    mode: IdentifierMode,
    options: &ExtractOptions,
    output: &Path,
    format: ExportFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let query = read_query(ids, options.uppercase_cells)?;
    if query.is_empty() {
        return Err("identifier list is empty".into());
    }
    log::info!("Loaded {} identifier(s)", query.len());

    let extraction = extract(multi, pdf, options).await?;
    if extraction.records.is_empty() {
        log::warn!("No rows detected in {pdf}; writing an empty result");
    }

    let result = find_matches_with_fallback(&extraction.records, &query, mode);
    log::info!(
        "Found {} match(es) for {} identifier(s) under {} mode",
        result.records.len(),
        query.len(),
        result.mode
    );

    rollcheck_export::write_file(output, &result.records, format)?;

    Ok(())
}

/// Runs the extract pipeline: reconstruct the full table and export it.
///
/// # Errors
///
/// Returns an error if the document cannot be loaded, no header is found,
/// or the output file cannot be written.
pub async fn run_extract(
    multi: &MultiProgress,
    pdf: &str,
    options: &ExtractOptions,
    output: &Path,
    format: ExportFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let extraction = extract(multi, pdf, options).await?;
    if extraction.records.is_empty() {
        log::warn!("No rows detected in {pdf}; writing an empty result");
    }

    rollcheck_export::write_file(output, &extraction.records, format)?;

    Ok(())
}
