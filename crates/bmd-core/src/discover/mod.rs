//! URL discovery: scan raw text for URLs or scrape a page for download links.
//!
//! Both paths produce an ordered, de-duplicated list of candidate URL
//! strings; filtering by extension happens later in the preparer.

mod page;

pub use page::{scrape_page, table_links};

use anyhow::{Context, Result};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;

/// Matches http(s) URLs in free-form text; stops at whitespace, quotes, and
/// commas so CSV cells come out clean.
const URL_PATTERN: &str = r#"(?i)https?://[^\s",]+"#;

/// Extracts all http(s) URLs from a text blob, de-duplicated in first-seen
/// order. Only exact string duplicates are removed.
pub fn extract_urls(text: &str) -> Result<Vec<String>> {
    let re = Regex::new(URL_PATTERN).context("URL pattern")?;
    Ok(dedup_preserving_order(
        re.find_iter(text).map(|m| m.as_str().to_string()),
    ))
}

/// Reads a CSV/text file and extracts its URLs.
pub fn extract_urls_from_file(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read url list {}", path.display()))?;
    extract_urls(&text)
}

/// First occurrence wins; later exact duplicates are dropped.
pub(crate) fn dedup_preserving_order(urls: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for url in urls {
        if seen.insert(url.clone()) {
            out.push(url);
        }
    }
    out
}
