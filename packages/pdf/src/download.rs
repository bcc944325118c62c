//! PDF download utilities.
//!
//! Boards publish allotment lists behind plain HTTP links; this module
//! fetches them with a rustls-backed [`reqwest::Client`].

use crate::PdfError;

/// Downloads a PDF and returns its raw bytes.
///
/// Non-success HTTP statuses are errors; a body is only returned for a
/// `2xx` response.
///
/// # Errors
///
/// Returns [`PdfError::Http`] if the request fails or the server responds
/// with an error status.
pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, PdfError> {
    let client = reqwest::Client::builder()
        .user_agent("rollcheck/0.1")
        .build()
        .map_err(PdfError::Http)?;

    let response = client.get(url).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;

    log::debug!("Downloaded {} bytes from {url}", bytes.len());

    Ok(bytes.to_vec())
}
