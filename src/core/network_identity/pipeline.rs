//! Turns a server address into a displayable location.
//!
//! The run never fails outward: every adapter failure collapses into one of
//! the sentinel records, and a cancelled run yields `None`.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::address::{is_local, is_quad_shaped};
use super::dns::NameResolver;
use super::geo::GeoLocator;
use super::identity::LocalIdentityProvider;
use super::location::{LocationRecord, Sentinel};
use crate::error::ResolutionError;

#[derive(Clone)]
pub struct LocationResolver {
    resolver: Arc<dyn NameResolver>,
    locator: Arc<dyn GeoLocator>,
    identity: Arc<dyn LocalIdentityProvider>,
}

impl LocationResolver {
    pub fn new(
        resolver: Arc<dyn NameResolver>,
        locator: Arc<dyn GeoLocator>,
        identity: Arc<dyn LocalIdentityProvider>,
    ) -> Self {
        Self {
            resolver,
            locator,
            identity,
        }
    }

    /// Resolve `address` to a location.
    ///
    /// `None` in, `None` out. Otherwise the result is `None` only when
    /// `cancel` fired before the run finished.
    pub async fn resolve(
        &self,
        address: Option<&str>,
        cancel: &CancellationToken,
    ) -> Option<LocationRecord> {
        let address = address?;

        match self.locate(address, cancel).await {
            Ok(record) => {
                log::info!(
                    "{} is in {}, {} ({})",
                    address,
                    record.city,
                    record.country_name,
                    record.country_code
                );
                Some(record)
            }
            Err(ResolutionError::Cancelled) => {
                log::debug!("Location run for {} cancelled", address);
                None
            }
            Err(e) => {
                log::warn!("Could not locate {}: {}", address, e);
                Sentinel::for_error(&e).map(|sentinel| sentinel.record())
            }
        }
    }

    async fn locate(
        &self,
        address: &str,
        cancel: &CancellationToken,
    ) -> Result<LocationRecord, ResolutionError> {
        let subject = self.query_subject(address, cancel).await?;
        self.locator.lookup(&subject, cancel).await
    }

    /// The IPv4 literal to hand to the geo lookup
    async fn query_subject(
        &self,
        address: &str,
        cancel: &CancellationToken,
    ) -> Result<String, ResolutionError> {
        if !is_local(address) {
            return self.literal_or_resolved(address, cancel).await;
        }

        // Private address: locate this machine by its host name
        let host = self
            .identity
            .host_name()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| ResolutionError::dns("local host name unavailable"))?;

        if is_local(&host) {
            return Err(ResolutionError::dns(format!(
                "local host name {} is itself a private address",
                host
            )));
        }

        self.literal_or_resolved(&host, cancel).await
    }

    async fn literal_or_resolved(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<String, ResolutionError> {
        if is_quad_shaped(name) {
            return Ok(name.to_string());
        }

        match self.resolver.resolve_host(name, cancel).await {
            Ok(resolved) => Ok(resolved),
            Err(e @ (ResolutionError::Cancelled | ResolutionError::DnsFailed(_))) => Err(e),
            Err(e) => Err(ResolutionError::dns(e.to_string())),
        }
    }
}
