//! Shared fixtures: a deterministic in-process transport and prober.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use bmd_core::job::{Job, JobStatus};
use bmd_core::probe::{ProbeResult, Prober};
use bmd_core::transport::{Transport, TransportOutcome, TransportRequest};

/// What the fake transport does for one URL.
#[derive(Debug, Clone)]
pub struct Behavior {
    /// Bytes written to the output path before finishing.
    pub write_bytes: usize,
    /// How long the transfer appears to take.
    pub hold: Duration,
    /// Hold until the abort flag trips instead of a fixed duration.
    pub linger_until_abort: bool,
    pub outcome: TransportOutcome,
}

impl Behavior {
    pub fn ok(write_bytes: usize, hold: Duration) -> Self {
        Self {
            write_bytes,
            hold,
            linger_until_abort: false,
            outcome: TransportOutcome::Ok,
        }
    }

    pub fn failing(write_bytes: usize, code: u32) -> Self {
        Self {
            write_bytes,
            hold: Duration::from_millis(5),
            linger_until_abort: false,
            outcome: TransportOutcome::Failed {
                code,
                detail: format!("scripted failure {code}"),
            },
        }
    }

    pub fn linger(write_bytes: usize) -> Self {
        Self {
            write_bytes,
            hold: Duration::ZERO,
            linger_until_abort: true,
            outcome: TransportOutcome::Ok,
        }
    }
}

/// In-process transport with scripted per-URL behavior. Tracks the peak
/// number of concurrent fetches and the order URLs were admitted in.
pub struct FakeTransport {
    behaviors: HashMap<String, Behavior>,
    current: AtomicUsize,
    peak: AtomicUsize,
    calls: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new(behaviors: HashMap<String, Behavior>) -> Self {
        Self {
            behaviors,
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Transport for FakeTransport {
    fn fetch(&self, req: &TransportRequest, abort: &AtomicBool) -> TransportOutcome {
        self.calls.lock().unwrap().push(req.url.clone());
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let behavior = self
            .behaviors
            .get(&req.url)
            .cloned()
            .unwrap_or_else(|| Behavior::ok(64, Duration::from_millis(5)));

        if behavior.write_bytes > 0 {
            std::fs::write(&req.output_path, vec![0u8; behavior.write_bytes]).unwrap();
        }

        let slice = Duration::from_millis(2);
        let mut waited = Duration::ZERO;
        let aborted = loop {
            if abort.load(Ordering::Relaxed) {
                break true;
            }
            if behavior.linger_until_abort {
                std::thread::sleep(slice);
                continue;
            }
            if waited >= behavior.hold {
                break false;
            }
            std::thread::sleep(slice);
            waited += slice;
        };

        self.current.fetch_sub(1, Ordering::SeqCst);
        if aborted {
            TransportOutcome::Aborted
        } else {
            behavior.outcome.clone()
        }
    }
}

/// Prober that never hits the network; canned results by URL.
#[derive(Default)]
pub struct FakeProber {
    responses: HashMap<String, ProbeResult>,
}

impl FakeProber {
    pub fn with(mut self, url: &str, probe: ProbeResult) -> Self {
        self.responses.insert(url.to_string(), probe);
        self
    }
}

impl Prober for FakeProber {
    fn probe(&self, url: &str) -> ProbeResult {
        self.responses.get(url).cloned().unwrap_or_default()
    }
}

/// A prepared, queued job pointing into `dir`.
pub fn queued_job(dir: &Path, url: &str, name: &str) -> Job {
    let mut job = Job::new(url, "mkv");
    job.name = Some(name.to_string());
    job.output_path = Some(dir.join(name));
    job.status = JobStatus::Queued;
    job
}
