//! WebMention (form POST) notification.

use crate::discovery::discover_webmention;
use crate::fetcher::{FetchError, FetchResult};
use crate::notifier::Outcome;
use reqwest::Client;
use tracing::{debug, error, info};

/// POSTs `source`/`target` form fields to the endpoint advertised by the
/// already-fetched target page. A 2xx status is success; everything else is
/// logged and reported as [`Outcome::Failed`].
pub async fn send_webmention(
    client: &Client,
    source_url: &str,
    target_url: &str,
    fetched: &FetchResult,
) -> Outcome {
    let Some(endpoint) = discover_webmention(fetched) else {
        debug!("no WebMention endpoint advertised by {target_url}");
        return Outcome::NoEndpoint;
    };

    let params = [("source", source_url), ("target", target_url)];
    match client.post(endpoint.clone()).form(&params).send().await {
        Ok(response) => {
            let status = response.status();
            if status.is_success() {
                info!("WebMention sent for link url {target_url} via {endpoint}");
                Outcome::Sent
            } else {
                error!(
                    "Failed to send WebMention for link url {target_url}: \
                     HTTP {status} from {endpoint}"
                );
                Outcome::Failed
            }
        }
        Err(err) => {
            let err = FetchError::from_reqwest_error(err);
            error!("Failed to send WebMention for link url {target_url}: {err}");
            Outcome::Failed
        }
    }
}
