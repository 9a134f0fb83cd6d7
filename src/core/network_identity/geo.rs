use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::http::{build_client, get_text};
use super::location::LocationRecord;
use crate::error::{Result, ResolutionError, SrvmonError};

#[async_trait]
pub trait GeoLocator: Send + Sync {
    /// Look up the location of an IPv4 literal
    async fn lookup(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> std::result::Result<LocationRecord, ResolutionError>;
}

/// Turn an ipapi.is style body into a record.
///
/// A body without a usable `ip` means the lookup itself failed; a body with
/// an `ip` but an unexpected `location` shape is a parse failure.
pub fn parse_geo_response(body: &str) -> std::result::Result<LocationRecord, ResolutionError> {
    let json: Value = serde_json::from_str(body)
        .map_err(|e| ResolutionError::geo(format!("response is not JSON: {}", e)))?;

    let ip_present = json["ip"].as_str().is_some_and(|ip| !ip.is_empty());
    if !ip_present {
        return Err(ResolutionError::geo("response has no ip"));
    }

    let location = json
        .get("location")
        .filter(|location| location.is_object())
        .ok_or_else(|| ResolutionError::parse("location missing"))?;

    let field = |name: &str| {
        location[name]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ResolutionError::parse(format!("location.{} missing", name)))
    };

    Ok(LocationRecord {
        city: field("city")?,
        country_name: field("country")?,
        country_code: field("country_code")?,
    })
}

pub struct IpApiLocator {
    client: reqwest::Client,
    endpoint: Url,
}

impl IpApiLocator {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| SrvmonError::invalid_endpoint(format!("{}: {}", endpoint, e)))?;

        Ok(Self {
            client: build_client(timeout)?,
            endpoint,
        })
    }

    fn query_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("q", query);
        url
    }
}

#[async_trait]
impl GeoLocator for IpApiLocator {
    async fn lookup(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> std::result::Result<LocationRecord, ResolutionError> {
        let body = get_text(
            &self.client,
            self.query_url(query),
            cancel,
            ResolutionError::GeoLookupFailed,
        )
        .await?;

        parse_geo_response(&body)
    }
}
