use crate::config::Config;
use crate::fetcher::{errors::FetchError, pipeline::decode_body, types::FetchResult};
use bytes::BytesMut;
use reqwest::{Client, ClientBuilder};
use tracing::instrument;

/// Builds the HTTP client shared by fetches and notifications for one run.
pub fn build_client(config: &Config) -> Result<Client, reqwest::Error> {
    ClientBuilder::new()
        .user_agent(config.user_agent.clone())
        .timeout(config.timeout)
        .connect_timeout(config.timeout)
        .danger_accept_invalid_certs(!config.verify_tls)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
}

/// Fetches `url` once, streaming the body and aborting with
/// [`FetchError::ResponseTooLarge`] as soon as the accumulated size reaches
/// `config.max_response_bytes`. Non-2xx statuses are errors.
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch(client: &Client, config: &Config, url: &str) -> Result<FetchResult, FetchError> {
    let parsed_url = url::Url::parse(url)?;
    let limit = config.max_response_bytes;

    let mut response = client
        .get(parsed_url)
        .send()
        .await
        .map_err(FetchError::from_reqwest_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Http { status });
    }

    // Trust a declared Content-Length enough to refuse early.
    if let Some(content_length) = response.content_length()
        && content_length >= limit as u64
    {
        return Err(FetchError::ResponseTooLarge { limit });
    }

    let url_final = response.url().clone();
    let headers = response.headers().clone();

    let mut body_bytes = BytesMut::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(FetchError::from_reqwest_error)?
    {
        if body_bytes.len() + chunk.len() >= limit {
            return Err(FetchError::ResponseTooLarge { limit });
        }
        body_bytes.extend_from_slice(&chunk);
    }

    let content_type = headers
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .unwrap_or("")
        .to_string();

    let body = decode_body(&content_type, &body_bytes)?;

    Ok(FetchResult {
        url: url_final,
        status,
        headers,
        body,
    })
}
