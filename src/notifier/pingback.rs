//! Pingback (XML-RPC) notification.

use crate::discovery::discover_pingback;
use crate::fetcher::{FetchError, FetchResult};
use crate::notifier::xmlrpc::{self, MethodResponse};
use crate::notifier::Outcome;
use reqwest::Client;
use tracing::{debug, error, info};

/// Pingback fault code for "this pingback has already been registered".
const FAULT_ALREADY_REGISTERED: i32 = 48;

/// Sends `pingback.ping(source, target)` to the endpoint advertised by the
/// already-fetched target page. Never fails outward; every failure mode is
/// logged and folded into the returned [`Outcome`].
pub async fn send_pingback(
    client: &Client,
    source_url: &str,
    target_url: &str,
    fetched: &FetchResult,
) -> Outcome {
    let Some(endpoint) = discover_pingback(fetched) else {
        debug!("no Pingback endpoint advertised by {target_url}");
        return Outcome::NoEndpoint;
    };

    let body = xmlrpc::ping_request(source_url, target_url);
    let response = match client
        .post(endpoint.clone())
        .header(reqwest::header::CONTENT_TYPE, "text/xml")
        .body(body)
        .send()
        .await
    {
        Ok(response) => response,
        Err(err) => {
            let err = FetchError::from_reqwest_error(err);
            error!("Failed to send Pingback for link url {target_url}: {err}");
            return Outcome::Failed;
        }
    };

    let status = response.status();
    if !status.is_success() {
        error!("Failed to send Pingback for link url {target_url}: HTTP {status} from {endpoint}");
        return Outcome::Failed;
    }

    let text = match response.text().await {
        Ok(text) => text,
        Err(err) => {
            error!("Failed to read Pingback response for link url {target_url}: {err}");
            return Outcome::Failed;
        }
    };

    match xmlrpc::parse_response(&text) {
        Ok(MethodResponse::Success) => {
            info!("Pingback sent for link url {target_url} via {endpoint}");
            Outcome::Sent
        }
        Ok(MethodResponse::Fault { code, message }) if code == FAULT_ALREADY_REGISTERED => {
            info!("Pingback already registered, XML-RPC response: code={code} - {message}");
            Outcome::AlreadyRegistered
        }
        Ok(MethodResponse::Fault { code, message }) => {
            error!("Pingback XML-RPC request failed: code={code} - {message}");
            Outcome::Failed
        }
        Err(err) => {
            error!("Failed to send Pingback for link url {target_url}: {err}");
            Outcome::Failed
        }
    }
}
