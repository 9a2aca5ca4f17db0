//! Linux-safe filename sanitization.

/// Linux NAME_MAX.
const MAX_NAME_BYTES: usize = 255;

/// Sanitizes a candidate filename for safe use on Linux.
///
/// Separators, NUL, control characters, and whitespace become `_` (runs
/// collapsed to one); leading/trailing dots, spaces, and underscores are
/// trimmed; the result is capped at 255 bytes on a char boundary.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_underscore = false;

    for c in name.chars() {
        let unsafe_char =
            c == '\0' || c == '/' || c == '\\' || c.is_control() || c == ' ' || c == '\t';
        if unsafe_char {
            if !last_was_underscore {
                out.push('_');
            }
            last_was_underscore = true;
        } else {
            out.push(c);
            last_was_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_' || c == ' ');
    if trimmed.len() <= MAX_NAME_BYTES {
        return trimmed.to_string();
    }

    let mut cut = MAX_NAME_BYTES;
    while cut > 0 && !trimmed.is_char_boundary(cut) {
        cut -= 1;
    }
    trimmed[..cut].to_string()
}
