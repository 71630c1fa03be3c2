//! `fetchkit links <url> <file_type>` – scrape a page for matching links.

use anyhow::Result;
use fetchkit_core::http::HttpOptions;
use fetchkit_core::scrape;

pub fn run_links(url: &str, file_type: &str, http: &HttpOptions) -> Result<()> {
    let links = scrape::scrape_links(url, file_type, http)?;
    if links.is_empty() {
        println!("No links matching {file_type:?} found.");
        return Ok(());
    }
    for href in links {
        println!("{href}");
    }
    Ok(())
}
