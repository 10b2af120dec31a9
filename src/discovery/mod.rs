//! Endpoint discovery for both linkback protocols.
//!
//! Pingback receivers advertise themselves through the `X-Pingback`
//! response header or a `<link rel="pingback">` element; WebMention
//! receivers through the HTTP `Link` header or `<link>`/`<a>` elements
//! carrying one of the webmention rel tokens. HTTP headers always win over
//! markup, and within markup the first element in document order wins.

use crate::fetcher::FetchResult;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

/// Accepted rel values for WebMention endpoint advertisement, covering the
/// historical webmention.org forms still found in the wild.
const WEBMENTION_RELS: [&str; 5] = [
    "webmention",
    "http://webmention.org",
    "http://webmention.org/",
    "https://webmention.org",
    "https://webmention.org/",
];

static REL_LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("link[rel][href], a[rel][href]").unwrap());

// One `Link` header entry: <uri> followed by its parameters.
static LINK_HEADER_ENTRY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<\s*([^>]*)\s*>\s*;([^,]*)"#).unwrap());

static REL_PARAM_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)rel\s*=\s*"([^"]*)"|rel\s*=\s*([^;\s]+)"#).unwrap());

/// Locates a Pingback endpoint: `X-Pingback` header first, then a
/// `rel="pingback"` element when the page is HTML.
pub fn discover_pingback(result: &FetchResult) -> Option<Url> {
    if let Some(value) = result.headers.get("X-Pingback")
        && let Ok(raw) = value.to_str()
    {
        return resolve(result, raw.trim());
    }
    if result.is_html() {
        return scan_markup(result, |rel| rel_tokens_contain(rel, &["pingback"]));
    }
    None
}

/// Locates a WebMention endpoint: HTTP `Link` header first, then
/// `rel="webmention"` (or a webmention.org variant) in the markup.
pub fn discover_webmention(result: &FetchResult) -> Option<Url> {
    for value in result.headers.get_all(reqwest::header::LINK) {
        let Ok(raw) = value.to_str() else { continue };
        for entry in LINK_HEADER_ENTRY_REGEX.captures_iter(raw) {
            let uri = entry.get(1).map(|m| m.as_str().trim()).unwrap_or("");
            let params = entry.get(2).map(|m| m.as_str()).unwrap_or("");
            if uri.is_empty() {
                continue;
            }
            if let Some(rel) = rel_param(params)
                && rel_tokens_contain(&rel, &WEBMENTION_RELS)
            {
                return resolve(result, uri);
            }
        }
    }
    if result.is_html() {
        return scan_markup(result, |rel| rel_tokens_contain(rel, &WEBMENTION_RELS));
    }
    None
}

fn scan_markup(result: &FetchResult, rel_matches: impl Fn(&str) -> bool) -> Option<Url> {
    let document = Html::parse_document(&result.body);
    for element in document.select(&REL_LINK_SELECTOR) {
        let rel = element.value().attr("rel").unwrap_or("");
        if !rel_matches(rel) {
            continue;
        }
        if let Some(href) = element.value().attr("href") {
            return resolve(result, href);
        }
    }
    None
}

fn rel_param(params: &str) -> Option<String> {
    let captures = REL_PARAM_REGEX.captures(params)?;
    captures
        .get(1)
        .or_else(|| captures.get(2))
        .map(|m| m.as_str().to_string())
}

fn rel_tokens_contain(rel: &str, accepted: &[&str]) -> bool {
    rel.split_whitespace()
        .any(|token| accepted.iter().any(|a| token.eq_ignore_ascii_case(a)))
}

fn resolve(result: &FetchResult, endpoint: &str) -> Option<Url> {
    match result.url.join(endpoint) {
        Ok(url) => Some(url),
        Err(err) => {
            debug!("discarding unparseable endpoint {endpoint:?}: {err}");
            None
        }
    }
}
