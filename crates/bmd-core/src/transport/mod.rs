//! Byte transport: the mechanism that streams a URL into a file.
//!
//! The executor and scheduler only ever see this trait; swapping libcurl for
//! anything else (or a deterministic fake in tests) touches nothing in the
//! state machine. A transport must follow redirects, resume from an existing
//! partial file, and honor the abort flag.

mod curl_transport;

pub use curl_transport::CurlTransport;

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use crate::auth::AuthContext;

/// One transfer order: fetch `url` into `output_path`.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub url: String,
    pub output_path: PathBuf,
    /// Opaque credential bundle attached as a header; never inspected.
    pub auth: Option<AuthContext>,
    /// Continue from the existing file length instead of restarting.
    pub resume: bool,
}

/// Terminal outcome of a transfer, retries already spent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportOutcome {
    /// All bytes written.
    Ok,
    /// Irrecoverable failure. `code` is the transport's own exit/status code.
    Failed { code: u32, detail: String },
    /// Stopped by the cooperative abort flag; partial bytes may remain.
    Aborted,
}

/// Blocking byte transport. Runs on a worker thread; the executor polls the
/// output file for progress while a fetch is in flight.
pub trait Transport: Send + Sync {
    fn fetch(&self, req: &TransportRequest, abort: &AtomicBool) -> TransportOutcome;
}
