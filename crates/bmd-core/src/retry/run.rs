//! Retry loop: run a transfer attempt until success or policy says stop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::classify;
use super::error::TransferError;
use super::policy::{RetryDecision, RetryPolicy};

/// Runs a closure until it succeeds or the retry policy says to stop. On a
/// retryable failure, sleeps the backoff delay (in short slices so an abort
/// request is noticed promptly) and tries again.
pub fn run_with_retry<F>(
    policy: &RetryPolicy,
    abort: &AtomicBool,
    mut attempt_fn: F,
) -> Result<(), TransferError>
where
    F: FnMut() -> Result<(), TransferError>,
{
    let mut attempt = 1u32;
    loop {
        match attempt_fn() {
            Ok(()) => return Ok(()),
            Err(e) => {
                let kind = classify::classify(&e);
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => return Err(e),
                    RetryDecision::RetryAfter(delay) => {
                        if !interruptible_sleep(delay, abort) {
                            return Err(TransferError::Aborted);
                        }
                        attempt += 1;
                    }
                }
            }
        }
    }
}

/// Sleeps `total` in 50ms slices; returns false if `abort` tripped.
fn interruptible_sleep(total: Duration, abort: &AtomicBool) -> bool {
    let slice = Duration::from_millis(50);
    let mut remaining = total;
    while !remaining.is_zero() {
        if abort.load(Ordering::Relaxed) {
            return false;
        }
        let step = remaining.min(slice);
        std::thread::sleep(step);
        remaining -= step;
    }
    !abort.load(Ordering::Relaxed)
}
