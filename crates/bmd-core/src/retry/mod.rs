//! Retry and backoff policy for the transport.
//!
//! Transient failures (timeouts, resets, throttling, 5xx) are retried with
//! exponential backoff inside the transport; each retry resumes from the
//! bytes already on disk. Only a final, exhausted failure reaches the
//! executor, which classifies it into FAIL or PAUSED.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::TransferError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
