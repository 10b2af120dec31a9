//! Charset detection and body decoding for fetched pages.

use crate::fetcher::errors::FetchError;
use encoding_rs::Encoding;
use once_cell::sync::Lazy;
use regex::Regex;

static CHARSET_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

/// Decodes a raw body to UTF-8: Content-Type charset, then `<meta charset>`
/// in the first 4 KiB, then a chardetng guess.
pub fn decode_body(content_type: &str, body_bytes: &[u8]) -> Result<String, FetchError> {
    let encoding = detect_encoding(content_type, body_bytes);
    let (decoded, _encoding, had_errors) = encoding.decode(body_bytes);
    if had_errors {
        return Err(FetchError::Charset(format!(
            "failed to decode body as {}",
            encoding.name()
        )));
    }
    Ok(decoded.into_owned())
}

fn detect_encoding(content_type: &str, body_bytes: &[u8]) -> &'static Encoding {
    if let Some(encoding) = encoding_from_capture(&CHARSET_REGEX, content_type) {
        return encoding;
    }

    let search_bytes = &body_bytes[..body_bytes.len().min(4096)];
    let search_str = String::from_utf8_lossy(search_bytes);
    if let Some(encoding) = encoding_from_capture(&META_CHARSET_REGEX, &search_str) {
        return encoding;
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(search_bytes, false);
    detector.guess(None, true)
}

fn encoding_from_capture(regex: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let captures = regex.captures(haystack)?;
    let label = captures.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes())
}
