//! End-to-end scheduler behavior with a deterministic in-process transport.

mod common;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bmd_core::control::StopToken;
use bmd_core::discover;
use bmd_core::job::JobStatus;
use bmd_core::prepare::prepare_jobs;
use bmd_core::scheduler::{run_queue, summarize, QueueOptions};

use common::{queued_job, Behavior, FakeProber, FakeTransport};

fn opts(concurrency: usize) -> QueueOptions {
    QueueOptions {
        concurrency,
        poll_interval: Duration::from_millis(5),
    }
}

#[tokio::test]
async fn concurrency_cap_is_never_exceeded() {
    let dir = tempfile::tempdir().unwrap();
    let mut behaviors = HashMap::new();
    let mut jobs = Vec::new();
    for i in 0..6 {
        let url = format!("https://x.test/ep{i}.mkv");
        behaviors.insert(url.clone(), Behavior::ok(128, Duration::from_millis(30)));
        jobs.push(queued_job(dir.path(), &url, &format!("ep{i}.mkv")));
    }
    let transport = Arc::new(FakeTransport::new(behaviors));

    let result = run_queue(
        jobs,
        transport.clone(),
        None,
        &opts(2),
        StopToken::new(),
        None,
    )
    .await
    .unwrap();

    assert!(transport.peak_concurrency() <= 2, "peak {}", transport.peak_concurrency());
    assert_eq!(result.len(), 6);
    assert!(result.iter().all(|j| j.status == JobStatus::Done));
    // No job is ever reported still running, and all are terminal.
    assert!(result.iter().all(|j| j.status.is_terminal()));
}

#[tokio::test]
async fn limit_one_fully_serializes() {
    let dir = tempfile::tempdir().unwrap();
    let mut behaviors = HashMap::new();
    for name in ["a.mkv", "b.mkv"] {
        behaviors.insert(
            format!("https://x.test/{name}"),
            Behavior::ok(64, Duration::from_millis(25)),
        );
    }
    let transport = Arc::new(FakeTransport::new(behaviors));
    let jobs = vec![
        queued_job(dir.path(), "https://x.test/a.mkv", "a.mkv"),
        queued_job(dir.path(), "https://x.test/b.mkv", "b.mkv"),
    ];

    let result = run_queue(jobs, transport.clone(), None, &opts(1), StopToken::new(), None)
        .await
        .unwrap();

    // The second job must not have entered RUNNING before the first finished.
    assert_eq!(transport.peak_concurrency(), 1);
    assert_eq!(
        transport.calls(),
        vec!["https://x.test/a.mkv", "https://x.test/b.mkv"]
    );
    assert!(result.iter().all(|j| j.status == JobStatus::Done));
}

#[tokio::test]
async fn admission_follows_input_order() {
    let dir = tempfile::tempdir().unwrap();
    let names = ["c.mkv", "a.mkv", "d.mkv", "b.mkv"];
    let mut behaviors = HashMap::new();
    let mut jobs = Vec::new();
    for name in names {
        let url = format!("https://x.test/{name}");
        behaviors.insert(url.clone(), Behavior::ok(16, Duration::from_millis(10)));
        jobs.push(queued_job(dir.path(), &url, name));
    }
    let transport = Arc::new(FakeTransport::new(behaviors));

    let result = run_queue(jobs, transport.clone(), None, &opts(1), StopToken::new(), None)
        .await
        .unwrap();

    let admitted = transport.calls();
    let expected: Vec<String> = names.iter().map(|n| format!("https://x.test/{n}")).collect();
    assert_eq!(admitted, expected);
    // Result order matches input order regardless of completion order.
    let result_names: Vec<&str> = result.iter().map(|j| j.name.as_deref().unwrap()).collect();
    assert_eq!(result_names, names);
}

#[tokio::test]
async fn skip_jobs_pass_through_without_a_slot() {
    let dir = tempfile::tempdir().unwrap();
    let mut behaviors = HashMap::new();
    behaviors.insert(
        "https://x.test/b.mkv".to_string(),
        Behavior::ok(64, Duration::from_millis(10)),
    );
    let transport = Arc::new(FakeTransport::new(behaviors));

    let mut skip = queued_job(dir.path(), "https://x.test/a.mkv", "a.mkv");
    skip.status = JobStatus::Skip;
    let jobs = vec![skip, queued_job(dir.path(), "https://x.test/b.mkv", "b.mkv")];

    let result = run_queue(jobs, transport.clone(), None, &opts(1), StopToken::new(), None)
        .await
        .unwrap();

    assert_eq!(result[0].status, JobStatus::Skip);
    assert_eq!(result[1].status, JobStatus::Done);
    // The skipped job never reached the transport.
    assert_eq!(transport.calls(), vec!["https://x.test/b.mkv"]);
}

#[tokio::test]
async fn failure_classification_by_partial_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let mut behaviors = HashMap::new();
    behaviors.insert("https://x.test/gone.mkv".to_string(), Behavior::failing(0, 1));
    behaviors.insert("https://x.test/cut.mkv".to_string(), Behavior::failing(512, 28));
    let transport = Arc::new(FakeTransport::new(behaviors));
    let jobs = vec![
        queued_job(dir.path(), "https://x.test/gone.mkv", "gone.mkv"),
        queued_job(dir.path(), "https://x.test/cut.mkv", "cut.mkv"),
    ];

    let result = run_queue(jobs, transport, None, &opts(2), StopToken::new(), None)
        .await
        .unwrap();

    assert_eq!(result[0].status, JobStatus::Fail);
    assert!(result[0].message.contains("exit 1"), "{}", result[0].message);
    assert_eq!(result[1].status, JobStatus::Paused);
    assert!(result[1].message.contains("partial"), "{}", result[1].message);

    let summary = summarize(&result);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.paused, 1);
}

#[tokio::test]
async fn stop_aborts_running_and_blocks_admission() {
    let dir = tempfile::tempdir().unwrap();
    let mut behaviors = HashMap::new();
    behaviors.insert("https://x.test/a.mkv".to_string(), Behavior::linger(256));
    behaviors.insert(
        "https://x.test/b.mkv".to_string(),
        Behavior::ok(64, Duration::from_millis(5)),
    );
    let transport = Arc::new(FakeTransport::new(behaviors));
    let jobs = vec![
        queued_job(dir.path(), "https://x.test/a.mkv", "a.mkv"),
        queued_job(dir.path(), "https://x.test/b.mkv", "b.mkv"),
    ];

    let stop = StopToken::new();
    let stop_clone = stop.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(40)).await;
        stop_clone.request_stop();
    });

    let result = run_queue(jobs, transport.clone(), None, &opts(1), stop, None)
        .await
        .unwrap();

    // First job was interrupted mid-flight; the second was never admitted.
    assert_eq!(result[0].status, JobStatus::Paused);
    assert_eq!(result[1].status, JobStatus::Queued);
    assert_eq!(transport.calls(), vec!["https://x.test/a.mkv"]);

    let summary = summarize(&result);
    assert_eq!(summary.paused, 1);
    assert_eq!(summary.not_started, 1);
}

#[tokio::test]
async fn paused_job_resubmission_resumes_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let mut behaviors = HashMap::new();
    behaviors.insert("https://x.test/a.mkv".to_string(), Behavior::failing(512, 28));
    let transport = Arc::new(FakeTransport::new(behaviors));
    let jobs = vec![queued_job(dir.path(), "https://x.test/a.mkv", "a.mkv")];

    let mut result = run_queue(jobs, transport, None, &opts(1), StopToken::new(), None)
        .await
        .unwrap();
    assert_eq!(result[0].status, JobStatus::Paused);
    let partial_path = result[0].output_path.clone().unwrap();
    assert_eq!(std::fs::metadata(&partial_path).unwrap().len(), 512);

    // Explicit caller resubmission: same job, same output path, success now.
    assert!(result[0].requeue());
    let mut behaviors = HashMap::new();
    behaviors.insert(
        "https://x.test/a.mkv".to_string(),
        Behavior::ok(1024, Duration::from_millis(5)),
    );
    let transport = Arc::new(FakeTransport::new(behaviors));
    let result = run_queue(result, transport, None, &opts(1), StopToken::new(), None)
        .await
        .unwrap();
    assert_eq!(result[0].status, JobStatus::Done);
    assert_eq!(result[0].output_path.as_deref(), Some(partial_path.as_path()));
}

#[tokio::test]
async fn discovery_prepare_run_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.mkv"), b"already downloaded").unwrap();

    let text = "https://x.test/a.mkv\nhttps://x.test/a.mkv\nhttps://x.test/b.mp4\n";
    let urls = discover::extract_urls(text).unwrap();
    assert_eq!(urls, vec!["https://x.test/a.mkv", "https://x.test/b.mp4"]);

    let jobs = prepare_jobs(&urls, "mkv", dir.path(), &FakeProber::default());
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].name.as_deref(), Some("a.mkv"));
    assert_eq!(jobs[0].status, JobStatus::Skip);
    assert_eq!(jobs[1].name.as_deref(), Some("b.mkv"));
    assert_eq!(jobs[1].status, JobStatus::Queued);

    let mut behaviors = HashMap::new();
    behaviors.insert(
        "https://x.test/b.mp4".to_string(),
        Behavior::ok(2048, Duration::from_millis(5)),
    );
    let transport = Arc::new(FakeTransport::new(behaviors));
    let result = run_queue(jobs, transport, None, &opts(2), StopToken::new(), None)
        .await
        .unwrap();

    let summary = summarize(&result);
    assert_eq!(summary.done, 1);
    assert_eq!(summary.skipped, 1);
    assert!(dir.path().join("b.mkv").exists());
}
