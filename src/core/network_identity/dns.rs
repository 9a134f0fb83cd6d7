//! DNS-over-HTTPS name resolution (JSON API flavour, as served by
//! `dns.google/resolve` and Cloudflare's `dns-query`).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::http::{build_client, get_text};
use crate::error::{Result, ResolutionError, SrvmonError};

#[async_trait]
pub trait NameResolver: Send + Sync {
    /// Resolve `host` to the first A record
    async fn resolve_host(
        &self,
        host: &str,
        cancel: &CancellationToken,
    ) -> std::result::Result<String, ResolutionError>;
}

#[derive(Debug, Deserialize)]
struct DnsResponse {
    #[serde(rename = "Status")]
    status: i64,
    #[serde(rename = "Answer", default)]
    answer: Vec<DnsAnswer>,
}

#[derive(Debug, Deserialize)]
struct DnsAnswer {
    data: String,
}

/// Extract the first answer from a DoH JSON body
pub fn parse_dns_response(body: &str) -> std::result::Result<String, ResolutionError> {
    let response: DnsResponse = serde_json::from_str(body)
        .map_err(|e| ResolutionError::dns(format!("undecodable response: {}", e)))?;

    if response.status != 0 {
        return Err(ResolutionError::dns(format!(
            "resolver returned status {}",
            response.status
        )));
    }

    response
        .answer
        .into_iter()
        .next()
        .map(|answer| answer.data)
        .ok_or_else(|| ResolutionError::dns("empty answer set"))
}

pub struct DohResolver {
    client: reqwest::Client,
    endpoint: Url,
}

impl DohResolver {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| SrvmonError::invalid_endpoint(format!("{}: {}", endpoint, e)))?;

        Ok(Self {
            client: build_client(timeout)?,
            endpoint,
        })
    }

    fn query_url(&self, host: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("name", host)
            .append_pair("type", "A");
        url
    }
}

#[async_trait]
impl NameResolver for DohResolver {
    async fn resolve_host(
        &self,
        host: &str,
        cancel: &CancellationToken,
    ) -> std::result::Result<String, ResolutionError> {
        let body = get_text(
            &self.client,
            self.query_url(host),
            cancel,
            ResolutionError::DnsFailed,
        )
        .await?;

        let address = parse_dns_response(&body)?;
        log::debug!("Resolved {} to {}", host, address);
        Ok(address)
    }
}
