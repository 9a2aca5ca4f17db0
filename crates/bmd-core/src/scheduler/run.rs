//! The admission loop.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::auth::AuthContext;
use crate::control::StopToken;
use crate::error::CoreError;
use crate::executor::{self, ProgressUpdate};
use crate::job::{Job, JobStatus};
use crate::transport::Transport;

/// Scheduler tuning.
#[derive(Debug, Clone)]
pub struct QueueOptions {
    /// Maximum jobs in the RUNNING state at once; clamped to at least 1.
    pub concurrency: usize,
    /// On-disk size poll cadence for progress ticks.
    pub poll_interval: Duration,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            concurrency: 2,
            poll_interval: Duration::from_millis(250),
        }
    }
}

/// Runs `jobs` to terminal states with bounded concurrency.
///
/// Skip (and any other already-terminal) jobs pass straight into the result
/// without occupying a slot. Queued jobs are admitted in input order; each
/// completion vacates a slot that is refilled immediately. The auth context
/// is captured once here and reused for every admitted download — no
/// re-authentication between jobs. A tripped `stop` token halts further
/// admission and aborts in-flight transfers; jobs never admitted come back
/// still Queued.
pub async fn run_queue(
    jobs: Vec<Job>,
    transport: Arc<dyn Transport>,
    auth: Option<AuthContext>,
    opts: &QueueOptions,
    stop: StopToken,
    progress: Option<mpsc::Sender<ProgressUpdate>>,
) -> Result<Vec<Job>, CoreError> {
    let limit = opts.concurrency.max(1);

    let mut slots: Vec<Option<Job>> = Vec::with_capacity(jobs.len());
    let mut pending: VecDeque<(usize, Job)> = VecDeque::new();
    for (index, job) in jobs.into_iter().enumerate() {
        if job.status == JobStatus::Queued {
            slots.push(None);
            pending.push_back((index, job));
        } else {
            slots.push(Some(job));
        }
    }

    let mut running: JoinSet<Result<(usize, Job), CoreError>> = JoinSet::new();
    loop {
        while running.len() < limit && !stop.is_stopped() {
            let Some((index, job)) = pending.pop_front() else {
                break;
            };
            let transport = Arc::clone(&transport);
            let auth = auth.clone();
            let stop = stop.clone();
            let progress = progress.clone();
            let poll_interval = opts.poll_interval;
            running.spawn(async move {
                let job = executor::execute_job(
                    index,
                    job,
                    transport,
                    auth,
                    &stop,
                    progress.as_ref(),
                    poll_interval,
                )
                .await?;
                Ok((index, job))
            });
        }

        let Some(joined) = running.join_next().await else {
            break;
        };
        let (index, job) = joined.map_err(|e| CoreError::TaskJoin(e.to_string()))??;
        slots[index] = Some(job);
    }

    // Never-admitted jobs (stop requested before their turn) stay Queued.
    for (index, job) in pending {
        slots[index] = Some(job);
    }

    Ok(slots
        .into_iter()
        .map(|slot| slot.expect("every job slot is filled"))
        .collect())
}
