//! Job preparation: candidate URLs in, ordered jobs out.
//!
//! Probes each URL for filename/size hints, filters by the desired
//! extension, infers the on-disk name, and decides SKIP vs QUEUED from the
//! filesystem. Writes nothing; the probe is the only network traffic here.

use std::path::Path;

use crate::job::{Job, JobStatus};
use crate::probe::Prober;
use crate::url_model;

/// Builds the ordered job list for `urls`.
///
/// A URL is kept when the fast extension predicate matches, or when the
/// inferred filename ends in the desired extension. Inference normalizes
/// every name to that suffix, so in practice every candidate is kept and
/// the extension decides the name rather than membership.
/// Output order follows input order. A job is SKIP exactly
/// when its output path exists at this moment; later filesystem changes do
/// not retroactively change the status.
pub fn prepare_jobs(
    urls: &[String],
    desired_ext: &str,
    target_dir: &Path,
    prober: &dyn Prober,
) -> Vec<Job> {
    let desired_ext = desired_ext.to_ascii_lowercase();
    let suffix = format!(".{desired_ext}");
    let mut jobs = Vec::new();

    for url in urls {
        let probe = prober.probe(url);
        let name = url_model::infer_filename(url, &probe, &desired_ext);

        if !url_model::url_matches_extension(url, &desired_ext)
            && !name.to_ascii_lowercase().ends_with(&suffix)
        {
            // Unreachable while inference always appends the extension.
            tracing::debug!(url, "candidate name lacks the desired extension");
            continue;
        }

        let output_path = target_dir.join(&name);
        let status = if output_path.exists() {
            JobStatus::Skip
        } else {
            JobStatus::Queued
        };

        let mut job = Job::new(url.clone(), desired_ext.clone());
        job.name = Some(name);
        job.expected_bytes = probe.content_length;
        job.output_path = Some(output_path);
        job.status = status;
        jobs.push(job);
    }

    jobs
}
