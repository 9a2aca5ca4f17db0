//! The Job entity: one URL's planned or executed download.
//!
//! Status transitions are one-way except for the explicit caller-driven
//! Paused → Queued resubmission, which reuses the existing partial file for
//! resume. The executor is the only mutator between Queued and a terminal
//! state; nothing self-resumes a paused job.

use std::path::PathBuf;

/// Lifecycle status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// Prepared and waiting for a scheduler slot.
    Queued,
    /// A transport is writing bytes for it right now.
    Running,
    /// Transport finished successfully.
    Done,
    /// Transport failed with no usable partial data.
    Fail,
    /// Stopped with partial data on disk, or interrupted; resumable by
    /// explicit resubmission.
    Paused,
    /// Output file already existed at preparation time; never executed.
    Skip,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "QUEUED",
            JobStatus::Running => "RUNNING",
            JobStatus::Done => "DONE",
            JobStatus::Fail => "FAIL",
            JobStatus::Paused => "PAUSED",
            JobStatus::Skip => "SKIP",
        }
    }

    /// True for every state the scheduler reports in its result set.
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobStatus::Queued | JobStatus::Running)
    }
}

/// One planned or executed download.
#[derive(Debug, Clone)]
pub struct Job {
    /// Source URL, immutable once created.
    pub url: String,
    /// Normalized target extension, lower-case, no leading dot (e.g. "mkv").
    pub desired_ext: String,
    /// Inferred output filename including extension.
    pub name: Option<String>,
    /// Total size learned from the probe, if the server sent one.
    pub expected_bytes: Option<u64>,
    /// Where bytes are/will be written.
    pub output_path: Option<PathBuf>,
    pub status: JobStatus,
    /// Human-readable detail; empty unless status is Fail or Paused.
    pub message: String,
}

impl Job {
    pub fn new(url: impl Into<String>, desired_ext: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            desired_ext: desired_ext.into(),
            name: None,
            expected_bytes: None,
            output_path: None,
            status: JobStatus::Queued,
            message: String::new(),
        }
    }

    pub(crate) fn mark_running(&mut self) {
        debug_assert_eq!(self.status, JobStatus::Queued);
        self.status = JobStatus::Running;
    }

    pub(crate) fn mark_done(&mut self) {
        self.status = JobStatus::Done;
        self.message.clear();
    }

    pub(crate) fn mark_failed(&mut self, message: impl Into<String>) {
        self.status = JobStatus::Fail;
        self.message = message.into();
    }

    pub(crate) fn mark_paused(&mut self, message: impl Into<String>) {
        self.status = JobStatus::Paused;
        self.message = message.into();
    }

    /// Explicit caller resubmission of a paused job. Keeps the output path so
    /// the next run resumes from the partial file. No-op for any other state.
    pub fn requeue(&mut self) -> bool {
        if self.status != JobStatus::Paused {
            return false;
        }
        self.status = JobStatus::Queued;
        self.message.clear();
        true
    }
}
