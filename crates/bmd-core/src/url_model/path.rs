//! Path-string helpers for filename inference.

/// Drops everything from the first `?` or `#` onward.
pub(super) fn strip_query_fragment(s: &str) -> &str {
    s.split(['?', '#']).next().unwrap_or(s)
}

/// Last path component of a URL or filename hint; strips both `/` and `\`
/// separators so a hostile disposition header cannot smuggle a directory.
pub(super) fn basename_component(s: &str) -> String {
    s.rsplit(['/', '\\']).next().unwrap_or(s).to_string()
}

/// Second-to-last `/`-separated segment of the raw URL, used to synthesize a
/// name for URLs whose path ends in the bare extension token.
pub(super) fn second_to_last_segment(url: &str) -> Option<&str> {
    let parts: Vec<&str> = url.split('/').collect();
    if parts.len() >= 2 {
        Some(parts[parts.len() - 2])
    } else {
        None
    }
}

/// Extension of `name` (no dot), if it has one beyond a leading dot.
pub(super) fn extension_of(name: &str) -> Option<&str> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext)
}
