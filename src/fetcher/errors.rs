use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("tls error: {0}")]
    Tls(String),

    #[error("connect error: {0}")]
    Connect(String),

    #[error("request timeout")]
    Timeout,

    #[error("http error {status}")]
    Http { status: reqwest::StatusCode },

    #[error("response exceeded {limit} bytes")]
    ResponseTooLarge { limit: usize },

    #[error("charset error: {0}")]
    Charset(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("unknown: {0}")]
    Unknown(String),
}

impl FetchError {
    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if is_tls(&err) {
            Self::Tls(err.to_string())
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Http { status }
        } else if err.is_request() || err.is_body() {
            Self::Io(err.to_string())
        } else {
            Self::Unknown(err.to_string())
        }
    }
}

fn is_tls(err: &reqwest::Error) -> bool {
    use std::error::Error;

    // reqwest does not expose a TLS predicate; walk the source chain for
    // the rustls/native-tls error types surfaced as strings.
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if text.contains("certificate") || text.contains("tls") || text.contains("ssl") {
            return true;
        }
        source = inner.source();
    }
    false
}
