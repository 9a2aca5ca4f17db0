//! Cooperative cancellation for the scheduler and in-flight transfers.
//!
//! A single `StopToken` is shared by the CLI (Ctrl-C handler), the
//! scheduler's admission loop, the executor's progress poll, and the
//! transport's abort check. Tripping it stops admission of further jobs and
//! lands running jobs in `Paused`; nothing is ever left in `Running`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable stop signal. All clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a graceful stop. Idempotent.
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Shared flag handed to blocking transports so they can abort mid-transfer.
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.0)
    }
}
