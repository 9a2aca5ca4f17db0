//! Scrape download links from an HTML page's tables.
//!
//! Download listings on the pages this targets are plain `<table>` rows with
//! an anchor in one of the cells. Anything more dynamic is out of scope.

use anyhow::{anyhow, Context, Result};
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

use crate::auth::AuthContext;
use crate::discover::dedup_preserving_order;

/// Fetches `page_url` and returns the anchor targets found in its table
/// rows, resolved against the page URL, de-duplicated in first-seen order.
/// A passive cookie may be supplied for pages that hide listings from
/// anonymous visitors.
pub fn scrape_page(page_url: &str, cookie: Option<&AuthContext>) -> Result<Vec<String>> {
    let html = fetch_html(page_url, cookie)?;
    table_links(&html, page_url)
}

/// Parses HTML and collects `href`s from anchors inside `<table>` rows.
pub fn table_links(html: &str, base_url: &str) -> Result<Vec<String>> {
    let row_selector =
        Selector::parse("table tr").map_err(|e| anyhow!("row selector: {e:?}"))?;
    let anchor_selector =
        Selector::parse("td a[href]").map_err(|e| anyhow!("anchor selector: {e:?}"))?;
    let base = Url::parse(base_url).context("page URL")?;

    let document = Html::parse_document(html);
    let mut links = Vec::new();
    for row in document.select(&row_selector) {
        for anchor in row.select(&anchor_selector) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let href = href.trim();
            if href.is_empty() || href.starts_with('#') {
                continue;
            }
            match base.join(href) {
                Ok(resolved) => links.push(resolved.to_string()),
                Err(e) => tracing::debug!(href, error = %e, "skipping unresolvable href"),
            }
        }
    }

    Ok(dedup_preserving_order(links))
}

fn fetch_html(page_url: &str, cookie: Option<&AuthContext>) -> Result<String> {
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(page_url).context("invalid page URL")?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(Duration::from_secs(15))?;
    easy.timeout(Duration::from_secs(60))?;

    if let Some(auth) = cookie {
        let mut list = curl::easy::List::new();
        list.append(&auth.cookie_header())?;
        easy.http_headers(list)?;
    }

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform().context("page fetch failed")?;
    }

    let code = easy.response_code().context("no response code")?;
    if !(200..300).contains(&code) {
        anyhow::bail!("GET {} returned HTTP {}", page_url, code);
    }

    Ok(String::from_utf8_lossy(&body).into_owned())
}
