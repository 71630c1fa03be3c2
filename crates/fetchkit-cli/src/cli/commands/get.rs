//! `fetchkit get <url> [dest]` – download a file.

use anyhow::Result;
use fetchkit_core::fetch::{self, FetchOptions};
use fetchkit_core::http::HttpOptions;
use fetchkit_core::url_model;
use std::path::PathBuf;

pub fn run_get(
    url: &str,
    dest: Option<PathBuf>,
    overwrite: bool,
    make_dir: bool,
    http: &HttpOptions,
) -> Result<()> {
    let dest = dest.unwrap_or_else(|| PathBuf::from(url_model::filename_from_url(url)));
    let opts = FetchOptions { overwrite, make_dir };
    let outcome = fetch::fetch_url(url, &dest, &opts, http)?;
    println!("{outcome}");
    Ok(())
}
