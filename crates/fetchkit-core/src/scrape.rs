//! Link scraping: fetch an HTML page and collect matching anchor hrefs.

use crate::http::{self, HttpError, HttpOptions};
use scraper::{Html, Selector};
use thiserror::Error;

/// Why a scrape failed.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The page could not be fetched.
    #[error("fetch of {url} failed: {source}")]
    Network { url: String, source: HttpError },
    /// The anchor selector failed to parse. Cannot happen with the built-in
    /// selector; kept so the extraction API stays total.
    #[error("invalid selector: {0}")]
    Selector(String),
}

/// Collects the href of every anchor in `html` whose value contains
/// `file_type` as a raw substring.
///
/// The match is literal, not extension-aware: ".pdf" also matches
/// "a.pdfx". Document order and duplicates are preserved; anchors without
/// an href are ignored.
pub fn extract_links(html: &str, file_type: &str) -> Result<Vec<String>, ScrapeError> {
    let selector =
        Selector::parse("a[href]").map_err(|e| ScrapeError::Selector(e.to_string()))?;
    let doc = Html::parse_document(html);
    Ok(doc
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| href.contains(file_type))
        .map(str::to_string)
        .collect())
}

/// Fetches `url` and returns every anchor href containing `file_type`.
///
/// One GET, no retries; href values are returned exactly as written in the
/// page, with no resolution against the base URL. A page with no matching
/// anchors yields an empty vector, not an error.
pub fn scrape_links(
    url: &str,
    file_type: &str,
    http: &HttpOptions,
) -> Result<Vec<String>, ScrapeError> {
    let body = http::get_bytes(url, http).map_err(|source| ScrapeError::Network {
        url: url.to_string(),
        source,
    })?;
    let html = String::from_utf8_lossy(&body);
    let links = extract_links(&html, file_type)?;
    tracing::debug!("{} links matching {:?} at {}", links.len(), file_type, url);
    Ok(links)
}
