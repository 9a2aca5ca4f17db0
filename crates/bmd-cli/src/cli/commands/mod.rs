//! Command implementations: discover, prepare, then run the queue.

pub mod file;
pub mod page;

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use bmd_core::auth::AuthContext;
use bmd_core::config::BmdConfig;
use bmd_core::control::StopToken;
use bmd_core::job::JobStatus;
use bmd_core::prepare::prepare_jobs;
use bmd_core::probe::CurlProber;
use bmd_core::scheduler::{run_queue, summarize, QueueOptions};
use bmd_core::transport::CurlTransport;

use super::{progress, DownloadOpts};

/// Anonymous prober with the configured limits.
pub(crate) fn probe_client(cfg: &BmdConfig) -> CurlProber {
    CurlProber::new(
        cfg.max_redirects,
        Duration::from_secs(cfg.connect_timeout_secs),
    )
}

/// Shared tail of every command: probe and filter the candidate URLs,
/// report counts, then drive the queue to completion with Ctrl-C wired to
/// the stop token. The prober comes from the caller: the page flow attaches
/// the session cookie passively, the file flow probes anonymously.
pub(crate) async fn download_all(
    urls: Vec<String>,
    opts: &DownloadOpts,
    cfg: &BmdConfig,
    prober: CurlProber,
) -> Result<()> {
    if urls.is_empty() {
        println!("No download links found.");
        return Ok(());
    }
    println!("Found {} candidate URL(s).", urls.len());

    fs::create_dir_all(&opts.target)
        .with_context(|| format!("create target directory {}", opts.target.display()))?;

    // Probing does HEAD requests; keep it off the async runtime threads.
    let target = opts.target.clone();
    let ext = opts.ext.clone();
    let jobs =
        tokio::task::spawn_blocking(move || prepare_jobs(&urls, &ext, &target, &prober)).await?;

    let queued = jobs.iter().filter(|j| j.status == JobStatus::Queued).count();
    let skipped = jobs.iter().filter(|j| j.status == JobStatus::Skip).count();
    println!("{queued} queued, {skipped} already present.");
    if queued == 0 {
        println!("Nothing to download.");
        return Ok(());
    }

    let stop = StopToken::new();
    let ctrlc_stop = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nstop requested; pausing in-flight downloads");
            ctrlc_stop.request_stop();
        }
    });

    let (tx, rx) = mpsc::channel(256);
    let printer = progress::spawn_printer(rx);

    let auth = opts.cookie.as_deref().and_then(AuthContext::from_cookie);
    let queue_opts = QueueOptions {
        concurrency: opts.jobs.unwrap_or(cfg.max_concurrent),
        poll_interval: cfg.poll_interval(),
    };
    let transport = Arc::new(CurlTransport::from_config(cfg));

    let result = run_queue(jobs, transport, auth, &queue_opts, stop, Some(tx)).await?;
    printer.await?;

    println!("{}", summarize(&result));
    for job in &result {
        if matches!(job.status, JobStatus::Fail | JobStatus::Paused) {
            let label = job.name.as_deref().unwrap_or(&job.url);
            println!("  {label}: {} ({})", job.status.as_str(), job.message);
        }
    }
    Ok(())
}
