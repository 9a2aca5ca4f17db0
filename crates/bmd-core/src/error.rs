//! Typed errors for the core library.
//!
//! Operational failures (probe unreachable, transport errors) are absorbed
//! into probe results and job statuses; only caller contract violations
//! surface as errors here.

use thiserror::Error;

/// Hard failures from the executor/scheduler. Transport failures never show
/// up here; they land in `Job::status` and `Job::message`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A non-skip job reached the executor without a required field.
    /// Indicates a bug in the caller's composition, not a network condition.
    #[error("job for {url} is missing its {field}")]
    InvalidJob { url: String, field: &'static str },

    /// A worker task panicked or was cancelled out from under the scheduler.
    #[error("worker task failed: {0}")]
    TaskJoin(String),
}
