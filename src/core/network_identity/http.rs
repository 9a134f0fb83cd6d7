//! Shared plumbing for the JSON-over-HTTP adapters.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::ResolutionError;

const USER_AGENT: &str = concat!("srvmon/", env!("CARGO_PKG_VERSION"));

pub fn build_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

/// GET `url` and return the body text.
///
/// Transport errors and non-2xx statuses are reported through `fail`;
/// cancellation is checked while waiting for the response and the body.
pub async fn get_text(
    client: &reqwest::Client,
    url: Url,
    cancel: &CancellationToken,
    fail: fn(String) -> ResolutionError,
) -> Result<String, ResolutionError> {
    log::debug!("GET {}", url);

    let response = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(ResolutionError::Cancelled),
        response = client.get(url).send() => response.map_err(|e| fail(e.to_string()))?,
    };

    let status = response.status();
    if !status.is_success() {
        return Err(fail(format!("HTTP {}", status)));
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ResolutionError::Cancelled),
        body = response.text() => body.map_err(|e| fail(e.to_string())),
    }
}
