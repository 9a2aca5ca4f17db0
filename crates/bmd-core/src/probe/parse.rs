//! Parse raw HTTP response header lines into a ProbeResult.
//!
//! The line list may span several responses when redirects were followed;
//! the last Content-Length and Location win, matching what the final hop
//! actually serves.

use super::ProbeResult;

/// Parses collected header lines. Unparseable values are simply skipped.
pub fn parse_probe_headers(lines: &[String]) -> ProbeResult {
    let mut result = ProbeResult::default();

    for line in lines {
        let line = line.trim();
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        let value = value.trim();

        if name.eq_ignore_ascii_case("content-length") {
            if let Ok(n) = value.parse::<u64>() {
                result.content_length = Some(n);
            }
        } else if name.eq_ignore_ascii_case("location") {
            if !value.is_empty() {
                result.final_location = Some(value.to_string());
            }
        } else if name.eq_ignore_ascii_case("content-disposition") {
            if let Some(filename) = disposition_filename(value) {
                result.disposition_filename = Some(filename);
            }
        }
    }

    result
}

/// Extracts the filename parameter from a Content-Disposition value.
/// Handles `filename="quoted"`, bare `filename=token`, and the RFC 5987
/// `filename*=UTF-8''percent-encoded` form; `filename*` wins when both
/// are present.
fn disposition_filename(value: &str) -> Option<String> {
    let mut plain: Option<String> = None;

    for param in value.split(';') {
        let param = param.trim();
        let Some((key, v)) = param.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let v = v.trim();

        if key.eq_ignore_ascii_case("filename*") {
            if let Some(decoded) = extended_filename(v) {
                return Some(decoded);
            }
        } else if key.eq_ignore_ascii_case("filename") {
            let cleaned = v.trim_matches(|c| c == '"' || c == '\'').trim();
            if !cleaned.is_empty() {
                plain = Some(cleaned.to_string());
            }
        }
    }

    plain
}

/// Decodes a `charset'lang'value` extended parameter. Only UTF-8 payloads
/// are accepted; anything malformed yields None and the plain form is used.
fn extended_filename(v: &str) -> Option<String> {
    let mut parts = v.splitn(3, '\'');
    let charset = parts.next()?;
    let _language = parts.next()?;
    let encoded = parts.next()?;
    if !charset.eq_ignore_ascii_case("utf-8") {
        return None;
    }

    let mut bytes = Vec::with_capacity(encoded.len());
    let mut rest = encoded.as_bytes().iter();
    while let Some(&b) = rest.next() {
        if b != b'%' {
            bytes.push(b);
            continue;
        }
        let high = rest.next().and_then(|&x| hex_nibble(x))?;
        let low = rest.next().and_then(|&x| hex_nibble(x))?;
        bytes.push(high << 4 | low);
    }

    let decoded = String::from_utf8(bytes).ok()?;
    if decoded.is_empty() {
        None
    } else {
        Some(decoded)
    }
}

fn hex_nibble(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn content_length_last_wins_after_redirect() {
        let r = parse_probe_headers(&lines(&[
            "HTTP/1.1 302 Found",
            "Location: https://cdn.x.test/real/ep01.mkv",
            "Content-Length: 0",
            "",
            "HTTP/1.1 200 OK",
            "Content-Length: 734003200",
        ]));
        assert_eq!(r.content_length, Some(734003200));
        assert_eq!(
            r.final_location.as_deref(),
            Some("https://cdn.x.test/real/ep01.mkv")
        );
    }

    #[test]
    fn disposition_quoted_and_token() {
        let r = parse_probe_headers(&lines(&[
            "Content-Disposition: attachment; filename=\"show.mkv\"",
        ]));
        assert_eq!(r.disposition_filename.as_deref(), Some("show.mkv"));

        let r = parse_probe_headers(&lines(&["Content-Disposition: attachment; filename=show.mkv"]));
        assert_eq!(r.disposition_filename.as_deref(), Some("show.mkv"));
    }

    #[test]
    fn disposition_extended_form_decodes_and_wins() {
        let r = parse_probe_headers(&lines(&[
            "Content-Disposition: attachment; filename*=UTF-8''show.mkv",
        ]));
        assert_eq!(r.disposition_filename.as_deref(), Some("show.mkv"));

        let r = parse_probe_headers(&lines(&[
            "Content-Disposition: attachment; filename=\"fallback.mkv\"; filename*=UTF-8''ep%2001.mkv",
        ]));
        assert_eq!(r.disposition_filename.as_deref(), Some("ep 01.mkv"));

        // Unknown charset or broken percent escapes fall back to the plain form.
        let r = parse_probe_headers(&lines(&[
            "Content-Disposition: attachment; filename=\"b.mkv\"; filename*=latin-9''a.mkv",
        ]));
        assert_eq!(r.disposition_filename.as_deref(), Some("b.mkv"));
    }

    #[test]
    fn empty_headers_give_default() {
        let r = parse_probe_headers(&[]);
        assert_eq!(r, ProbeResult::default());
    }

    #[test]
    fn garbage_values_are_skipped() {
        let r = parse_probe_headers(&lines(&[
            "Content-Length: not-a-number",
            "Content-Disposition: attachment; filename=\"\"",
            "no colon here",
        ]));
        assert_eq!(r, ProbeResult::default());
    }
}
