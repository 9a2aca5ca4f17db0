//! Per-status counts for the CLI exit summary.

use std::fmt;

use crate::job::{Job, JobStatus};

/// Counts of jobs per terminal status after a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub done: usize,
    pub failed: usize,
    pub paused: usize,
    pub skipped: usize,
    /// Jobs never admitted because a stop was requested.
    pub not_started: usize,
}

/// Tallies a finished result list.
pub fn summarize(jobs: &[Job]) -> RunSummary {
    let mut summary = RunSummary::default();
    for job in jobs {
        match job.status {
            JobStatus::Done => summary.done += 1,
            JobStatus::Fail => summary.failed += 1,
            JobStatus::Paused => summary.paused += 1,
            JobStatus::Skip => summary.skipped += 1,
            JobStatus::Queued => summary.not_started += 1,
            JobStatus::Running => {
                debug_assert!(false, "running job in a finished result list");
            }
        }
    }
    summary
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} done, {} failed, {} paused, {} skipped",
            self.done, self.failed, self.paused, self.skipped
        )?;
        if self.not_started > 0 {
            write!(f, ", {} not started", self.not_started)?;
        }
        Ok(())
    }
}
