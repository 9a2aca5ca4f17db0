use anyhow::Result;

use bmd_core::auth::AuthContext;
use bmd_core::config::BmdConfig;
use bmd_core::discover;

use super::super::DownloadOpts;

/// `bmd page`: scrape a page's download table and download its links.
/// The session cookie, if given, is also sent with the page fetch and as a
/// passive cookie on the probes, since listings and their HEAD responses
/// commonly sit behind the same login.
pub async fn run(url: &str, opts: &DownloadOpts, cfg: &BmdConfig) -> Result<()> {
    tracing::info!(url, "scraping page for download links");
    let cookie = opts.cookie.as_deref().and_then(AuthContext::from_cookie);
    let prober = super::probe_client(cfg).with_passive_cookie(cookie.clone());
    let page_url = url.to_string();
    let urls =
        tokio::task::spawn_blocking(move || discover::scrape_page(&page_url, cookie.as_ref()))
            .await??;
    super::download_all(urls, opts, cfg, prober).await
}
