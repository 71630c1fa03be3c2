//! Shared HTTP GET plumbing for the fetcher and the scraper.
//!
//! Uses the curl crate (libcurl): redirects followed, bounded connect and
//! total timeouts, custom User-Agent. Body bytes are streamed to a
//! caller-supplied sink so file downloads never buffer in memory.

use crate::config::FetchkitConfig;
use std::time::Duration;
use thiserror::Error;

/// Knobs for a single GET, usually built from the config file.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Whole-request timeout. A server that stops sending forever cannot
    /// hang the caller past this.
    pub timeout: Duration,
    /// Maximum redirects followed per request.
    pub max_redirects: u32,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self::from_config(&FetchkitConfig::default())
    }
}

impl HttpOptions {
    pub fn from_config(cfg: &FetchkitConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: Duration::from_secs(cfg.request_timeout_secs),
            max_redirects: cfg.max_redirects,
            user_agent: cfg.user_agent.clone(),
        }
    }
}

/// Error from a single GET: transport-level failure or non-2xx status.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Curl reported an error (invalid URL, DNS, connect, timeout, ...).
    #[error(transparent)]
    Curl(#[from] curl::Error),
    /// The response had a non-2xx status.
    #[error("HTTP {code}")]
    Status { code: u32 },
}

/// Performs a GET and streams body chunks to `sink`.
///
/// `sink` returns false to abort the transfer (e.g. on a local write error);
/// the abort surfaces as a curl write error from `perform`. Fails on any
/// non-2xx final status.
pub fn get<F>(url: &str, opts: &HttpOptions, mut sink: F) -> Result<(), HttpError>
where
    F: FnMut(&[u8]) -> bool,
{
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(opts.max_redirects)?;
    easy.useragent(&opts.user_agent)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.timeout)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(move |data| {
            if sink(data) {
                Ok(data.len())
            } else {
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if code < 200 || code >= 300 {
        return Err(HttpError::Status { code });
    }

    Ok(())
}

/// Performs a GET and collects the whole body in memory. Meant for small
/// documents (scraped pages), not file downloads.
pub fn get_bytes(url: &str, opts: &HttpOptions) -> Result<Vec<u8>, HttpError> {
    let mut body = Vec::new();
    get(url, opts, |chunk| {
        body.extend_from_slice(chunk);
        true
    })?;
    Ok(body)
}
