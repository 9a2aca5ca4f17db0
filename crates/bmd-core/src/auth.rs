//! Opaque authentication context threaded through probe and transport.
//!
//! The core never parses the cookie string; it only attaches it as a
//! `Cookie:` header. Keeping auth an explicit value (rather than process
//! state) pins the reuse-one-session policy at the call sites.

/// Opaque credential bundle, currently a raw cookie header value
/// (e.g. `session=abc123; remember=1`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext(String);

impl AuthContext {
    /// Wraps a raw cookie string. Returns `None` for blank input so callers
    /// can treat an empty `--cookie` the same as no auth at all.
    pub fn from_cookie(cookie: &str) -> Option<Self> {
        let trimmed = cookie.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Full header line to attach to a request.
    pub fn cookie_header(&self) -> String {
        format!("Cookie: {}", self.0)
    }
}
