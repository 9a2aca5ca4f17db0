//! Transfer error type for retry classification.

use std::fmt;

/// Error from a single transfer attempt. Classified before being folded
/// into the job's status/message, never propagated as an exception.
#[derive(Debug)]
pub enum TransferError {
    /// Curl reported an error (timeout, connection, etc.).
    Curl(curl::Error),
    /// HTTP response had a non-2xx status.
    Http(u32),
    /// Disk write failed (e.g. disk full, permission denied). Not retried.
    Storage(std::io::Error),
    /// Transfer stopped by the cooperative cancellation flag. Not an error
    /// condition; mapped to PAUSED by the executor.
    Aborted,
}

impl TransferError {
    /// Numeric code surfaced in job messages (curl code or HTTP status).
    pub fn code(&self) -> u32 {
        match self {
            TransferError::Curl(e) => e.code(),
            TransferError::Http(code) => *code,
            TransferError::Storage(_) => 0,
            TransferError::Aborted => 0,
        }
    }
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::Curl(e) => write!(f, "{}", e),
            TransferError::Http(code) => write!(f, "HTTP {}", code),
            TransferError::Storage(e) => write!(f, "storage: {}", e),
            TransferError::Aborted => write!(f, "aborted"),
        }
    }
}

impl std::error::Error for TransferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransferError::Curl(e) => Some(e),
            TransferError::Storage(e) => Some(e),
            TransferError::Http(_) | TransferError::Aborted => None,
        }
    }
}
