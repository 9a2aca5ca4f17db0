//! Metadata probe: a HEAD request that learns filename hints and size.
//!
//! The probe never downloads a body and never fails loudly — an unreachable
//! server or garbage headers degrade to an empty `ProbeResult` and the job
//! proceeds with an unknown size. Uses the curl crate (libcurl), following
//! redirects so the Content-Length and Location reflect the final hop.

mod parse;

pub use parse::parse_probe_headers;

use anyhow::{Context, Result};
use std::str;
use std::time::Duration;

use crate::auth::AuthContext;

/// Hints learned from response headers. Everything is optional; `default()`
/// is the "probe unavailable" value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeResult {
    /// Filename from a `Content-Disposition` header, if present.
    pub disposition_filename: Option<String>,
    /// Final URL after redirects (or the last `Location` header seen).
    pub final_location: Option<String>,
    /// `Content-Length` of the final response, if the server sent one.
    pub content_length: Option<u64>,
}

/// Seam for tests and alternative metadata sources.
///
/// Probing runs without the per-download auth context: a HEAD with download
/// credentials could burn a one-shot token or trip rate limiting before the
/// real transfer. A passive cookie may be configured on the prober itself.
pub trait Prober: Send + Sync {
    fn probe(&self, url: &str) -> ProbeResult;
}

/// libcurl-backed prober.
pub struct CurlProber {
    max_redirects: u32,
    connect_timeout: Duration,
    passive_cookie: Option<AuthContext>,
}

impl CurlProber {
    pub fn new(max_redirects: u32, connect_timeout: Duration) -> Self {
        Self {
            max_redirects,
            connect_timeout,
            passive_cookie: None,
        }
    }

    /// Attach a passive cookie sent with every probe. Distinct from the
    /// per-download auth context, which the probe never sees.
    pub fn with_passive_cookie(mut self, cookie: Option<AuthContext>) -> Self {
        self.passive_cookie = cookie;
        self
    }

    /// Raw header lines plus libcurl's post-redirect effective URL.
    fn head_request(&self, url: &str) -> Result<(Vec<String>, Option<String>)> {
        let mut lines: Vec<String> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url).context("invalid URL")?;
        easy.nobody(true)?; // HEAD request
        easy.follow_location(true)?;
        easy.max_redirections(self.max_redirects)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(Duration::from_secs(30))?;

        if let Some(auth) = &self.passive_cookie {
            let mut list = curl::easy::List::new();
            list.append(&auth.cookie_header())?;
            easy.http_headers(list)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    lines.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.perform().context("HEAD request failed")?;
        }

        let effective = easy.effective_url().ok().flatten().map(|s| s.to_string());
        Ok((lines, effective))
    }
}

impl Prober for CurlProber {
    fn probe(&self, url: &str) -> ProbeResult {
        match self.head_request(url) {
            Ok((lines, effective)) => {
                let mut result = parse_probe_headers(&lines);
                // libcurl's effective URL is more reliable than raw Location
                // headers when several redirects stack up.
                if let Some(eff) = effective {
                    if eff != url {
                        result.final_location = Some(eff);
                    }
                }
                result
            }
            Err(e) => {
                tracing::debug!(url, error = %e, "probe failed; continuing without metadata");
                ProbeResult::default()
            }
        }
    }
}
