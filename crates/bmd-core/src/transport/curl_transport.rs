//! libcurl-backed transport with resume, redirects, and retry.

use std::cell::RefCell;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::config::BmdConfig;
use crate::retry::{run_with_retry, RetryPolicy, TransferError};

use super::{Transport, TransportOutcome, TransportRequest};

/// Streams a URL to disk with libcurl. Each retry attempt re-reads the
/// on-disk length and resumes from there, so transient failures cost only
/// the backoff delay, not the bytes already written.
pub struct CurlTransport {
    max_redirects: u32,
    connect_timeout: Duration,
    retry: RetryPolicy,
}

impl CurlTransport {
    pub fn new(max_redirects: u32, connect_timeout: Duration, retry: RetryPolicy) -> Self {
        Self {
            max_redirects,
            connect_timeout,
            retry,
        }
    }

    pub fn from_config(cfg: &BmdConfig) -> Self {
        let retry = cfg
            .retry
            .as_ref()
            .map(RetryPolicy::from_config)
            .unwrap_or_default();
        Self::new(
            cfg.max_redirects,
            Duration::from_secs(cfg.connect_timeout_secs),
            retry,
        )
    }

    fn attempt_once(
        &self,
        req: &TransportRequest,
        abort: &AtomicBool,
    ) -> Result<(), TransferError> {
        let resume_offset = if req.resume {
            std::fs::metadata(&req.output_path)
                .map(|m| m.len())
                .unwrap_or(0)
        } else {
            0
        };

        let mut open = std::fs::OpenOptions::new();
        open.create(true).write(true);
        if resume_offset > 0 {
            open.append(true);
        } else {
            open.truncate(true);
        }
        let mut file = open
            .open(&req.output_path)
            .map_err(TransferError::Storage)?;

        let mut easy = curl::easy::Easy::new();
        easy.url(&req.url).map_err(TransferError::Curl)?;
        easy.follow_location(true).map_err(TransferError::Curl)?;
        easy.max_redirections(self.max_redirects)
            .map_err(TransferError::Curl)?;
        // No body is written for HTTP >= 400; the attempt surfaces the status.
        easy.fail_on_error(true).map_err(TransferError::Curl)?;
        easy.connect_timeout(self.connect_timeout)
            .map_err(TransferError::Curl)?;
        easy.low_speed_limit(1024).map_err(TransferError::Curl)?;
        easy.low_speed_time(Duration::from_secs(30))
            .map_err(TransferError::Curl)?;
        easy.progress(true).map_err(TransferError::Curl)?;
        if resume_offset > 0 {
            easy.resume_from(resume_offset).map_err(TransferError::Curl)?;
        }
        if let Some(auth) = &req.auth {
            let mut list = curl::easy::List::new();
            list.append(&auth.cookie_header())
                .map_err(TransferError::Curl)?;
            easy.http_headers(list).map_err(TransferError::Curl)?;
        }

        let write_failed: RefCell<Option<std::io::Error>> = RefCell::new(None);
        let result = {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| match file.write_all(data) {
                    Ok(()) => Ok(data.len()),
                    Err(e) => {
                        *write_failed.borrow_mut() = Some(e);
                        // Short write makes libcurl stop the transfer.
                        Ok(0)
                    }
                })
                .map_err(TransferError::Curl)?;
            transfer
                .progress_function(|_, _, _, _| !abort.load(Ordering::Relaxed))
                .map_err(TransferError::Curl)?;
            transfer.perform()
        };

        if let Some(io_err) = write_failed.into_inner() {
            return Err(TransferError::Storage(io_err));
        }

        match result {
            Ok(()) => Ok(()),
            Err(e) if e.is_aborted_by_callback() => Err(TransferError::Aborted),
            Err(e) if e.is_http_returned_error() => {
                let code = easy.response_code().unwrap_or(0);
                Err(TransferError::Http(code))
            }
            Err(e) => Err(TransferError::Curl(e)),
        }
    }
}

impl Transport for CurlTransport {
    fn fetch(&self, req: &TransportRequest, abort: &AtomicBool) -> TransportOutcome {
        let result = run_with_retry(&self.retry, abort, || self.attempt_once(req, abort));
        match result {
            Ok(()) => TransportOutcome::Ok,
            Err(TransferError::Aborted) => TransportOutcome::Aborted,
            Err(e) => {
                tracing::debug!(url = %req.url, error = %e, "transfer failed after retries");
                TransportOutcome::Failed {
                    code: e.code(),
                    detail: e.to_string(),
                }
            }
        }
    }
}
