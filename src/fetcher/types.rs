use reqwest::{StatusCode, header::HeaderMap};
use url::Url;

/// A fetched page: decoded body plus the response headers, kept together
/// so discovery and both notifiers can work from a single GET.
#[derive(Debug)]
pub struct FetchResult {
    /// Final URL after redirects; relative endpoints resolve against it.
    pub url: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Body decoded to UTF-8 according to the detected charset.
    pub body: String,
}

impl FetchResult {
    /// Content-Type header value, empty when absent.
    pub fn content_type(&self) -> &str {
        self.headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("")
    }

    /// Whether the response self-describes as HTML.
    pub fn is_html(&self) -> bool {
        let ct = self.content_type();
        ct.contains("text/html") || ct.contains("application/xhtml")
    }
}
