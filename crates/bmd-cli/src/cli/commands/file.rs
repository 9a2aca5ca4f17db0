use std::path::Path;

use anyhow::Result;

use bmd_core::config::BmdConfig;
use bmd_core::discover;

use super::super::DownloadOpts;

/// `bmd file`: scan a CSV/text file for URLs and download the matches.
/// Probes run anonymously; the cookie, if given, is only for the downloads.
pub async fn run(input: &Path, opts: &DownloadOpts, cfg: &BmdConfig) -> Result<()> {
    tracing::info!(input = %input.display(), "scanning file for URLs");
    let urls = discover::extract_urls_from_file(input)?;
    super::download_all(urls, opts, cfg, super::probe_client(cfg)).await
}
