//! URL modeling: extension matching and output filename inference.
//!
//! Turns a bare URL plus probe hints into a trustworthy on-disk basename
//! that always ends in the desired extension, sanitized for Linux
//! filesystems.

mod path;
mod sanitize;

pub use sanitize::sanitize_filename;

use crate::probe::ProbeResult;

/// Extensions the normalizer recognizes as video containers. A candidate
/// name ending in one of these keeps its base name when the extension is
/// swapped for the desired one; anything else gets the desired extension
/// appended.
pub const KNOWN_VIDEO_EXTENSIONS: [&str; 2] = ["mkv", "mp4"];

/// Fallback base name when a URL has no usable path segments at all.
const DEFAULT_BASENAME: &str = "download";

/// Fast pre-filter: does this URL plausibly point at a file of the desired
/// extension?
///
/// True if the URL ends with `.{ext}`, ends with `/{ext}`, or contains
/// `/{ext}` immediately followed by `?` or `#`. Deliberately permissive and
/// deliberately applied to the raw URL — query strings and fragments are
/// never stripped here, at any call site. Final inclusion is always
/// confirmed against the inferred filename.
pub fn url_matches_extension(url: &str, desired_ext: &str) -> bool {
    let u = url.to_ascii_lowercase();
    let ext = desired_ext.to_ascii_lowercase();
    u.ends_with(&format!(".{ext}"))
        || u.ends_with(&format!("/{ext}"))
        || u.contains(&format!("/{ext}?"))
        || u.contains(&format!("/{ext}#"))
}

/// Derives the output basename for a download.
///
/// Hint priority: Content-Disposition filename, then the basename of the
/// final redirect location (query/fragment stripped), then the basename of
/// the URL itself (query/fragment stripped). A candidate that is empty or a
/// bare extension token (literally "mkv"/"mp4") is replaced by a synthetic
/// name built from the URL's second-to-last path segment. The result is
/// sanitized and normalized so it always ends in `.{desired_ext}`.
/// Idempotent: inferring from an already-correct URL returns the same name.
pub fn infer_filename(url: &str, probe: &ProbeResult, desired_ext: &str) -> String {
    let desired_ext = desired_ext.to_ascii_lowercase();

    let candidate = probe
        .disposition_filename
        .as_deref()
        .map(path::basename_component)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            probe
                .final_location
                .as_deref()
                .map(|loc| path::basename_component(path::strip_query_fragment(loc)))
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_else(|| path::basename_component(path::strip_query_fragment(url)));

    let mut name = sanitize_filename(&candidate);

    // A bare token like "mkv" means the URL path ended in the extension
    // itself; name the file after the segment before it instead.
    let lower = name.to_ascii_lowercase();
    if lower.is_empty() || KNOWN_VIDEO_EXTENSIONS.contains(&lower.as_str()) {
        let parent = path::second_to_last_segment(url)
            .map(|s| sanitize_filename(s))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BASENAME.to_string());
        return format!("{parent}.{desired_ext}");
    }

    match path::extension_of(&name) {
        Some(ext) if KNOWN_VIDEO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) => {
            if ext.eq_ignore_ascii_case(&desired_ext) {
                name
            } else {
                let stem = &name[..name.len() - ext.len() - 1];
                format!("{stem}.{desired_ext}")
            }
        }
        _ => {
            name.push('.');
            name.push_str(&desired_ext);
            name
        }
    }
}
