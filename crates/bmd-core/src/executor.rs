//! Download Executor: drives one job through its state machine.
//!
//! The transport runs on a blocking worker thread; this task polls the
//! on-disk size at a fixed cadence for progress reporting, then classifies
//! the outcome. Transport failures never escape as errors — status and
//! message are the only error channel. The sole hard failure is a contract
//! violation (a non-skip job missing its name or output path).

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::auth::AuthContext;
use crate::control::StopToken;
use crate::error::CoreError;
use crate::job::{Job, JobStatus};
use crate::transport::{Transport, TransportOutcome, TransportRequest};

/// One progress tick for one job, fired at the polling cadence while the
/// job runs and once more when it reaches a terminal state.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    /// Position of the job in the scheduler's input list.
    pub index: usize,
    pub name: String,
    pub status: JobStatus,
    pub bytes_done: u64,
    pub expected_bytes: Option<u64>,
}

impl ProgressUpdate {
    /// Fraction complete in [0, 1]; 0 when the total size is unknown.
    pub fn fraction(&self) -> f64 {
        match self.expected_bytes {
            Some(total) if total > 0 => (self.bytes_done as f64 / total as f64).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }
}

/// Runs one job to a terminal state and returns it.
///
/// Skip jobs pass through untouched, which makes this safe to call
/// uniformly over a mixed list. Resume is implicit: if the output path
/// already holds partial bytes, the transport continues from that offset.
pub async fn execute_job(
    index: usize,
    mut job: Job,
    transport: Arc<dyn Transport>,
    auth: Option<AuthContext>,
    stop: &StopToken,
    progress: Option<&mpsc::Sender<ProgressUpdate>>,
    poll_interval: Duration,
) -> Result<Job, CoreError> {
    if job.status == JobStatus::Skip {
        return Ok(job);
    }

    let name = job.name.clone().ok_or_else(|| CoreError::InvalidJob {
        url: job.url.clone(),
        field: "name",
    })?;
    let output_path = job.output_path.clone().ok_or_else(|| CoreError::InvalidJob {
        url: job.url.clone(),
        field: "output path",
    })?;

    job.mark_running();
    tracing::info!(name = %name, url = %job.url, "download started");

    let request = TransportRequest {
        url: job.url.clone(),
        output_path: output_path.clone(),
        auth,
        resume: true,
    };
    let abort = stop.flag();
    let worker = tokio::task::spawn_blocking(move || transport.fetch(&request, &abort));

    while !worker.is_finished() {
        if let Some(tx) = progress {
            let tick = ProgressUpdate {
                index,
                name: name.clone(),
                status: JobStatus::Running,
                bytes_done: disk_size(&output_path).await,
                expected_bytes: job.expected_bytes,
            };
            let _ = tx.try_send(tick);
        }
        tokio::time::sleep(poll_interval).await;
    }

    let outcome = worker
        .await
        .map_err(|e| CoreError::TaskJoin(e.to_string()))?;
    let bytes_on_disk = disk_size(&output_path).await;

    match outcome {
        TransportOutcome::Ok => {
            job.mark_done();
            tracing::info!(name = %name, bytes = bytes_on_disk, "download complete");
        }
        TransportOutcome::Aborted => {
            let message = if bytes_on_disk > 0 {
                "interrupted (partial saved)"
            } else {
                "interrupted"
            };
            job.mark_paused(message);
            tracing::info!(name = %name, "download interrupted");
        }
        TransportOutcome::Failed { code, detail } => {
            if bytes_on_disk > 0 {
                job.mark_paused(format!("transport exit {code} (partial saved): {detail}"));
                tracing::warn!(name = %name, code, "download paused with partial data");
            } else {
                job.mark_failed(format!("transport exit {code}: {detail}"));
                tracing::warn!(name = %name, code, "download failed");
            }
        }
    }

    if let Some(tx) = progress {
        let _ = tx.try_send(ProgressUpdate {
            index,
            name,
            status: job.status,
            bytes_done: bytes_on_disk,
            expected_bytes: job.expected_bytes,
        });
    }

    Ok(job)
}

async fn disk_size(path: &Path) -> u64 {
    tokio::fs::metadata(path).await.map(|m| m.len()).unwrap_or(0)
}
