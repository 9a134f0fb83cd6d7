//! Tokio runtime behind a server details view.
//!
//! Owns the stats channel and the location watcher for one view. Cancelling
//! the view token stops both, including any location lookups still in
//! flight; dropping the runtime aborts whatever is left.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::config::Config;
use super::network_identity::{
    DohResolver, IpApiLocator, LocationRecord, LocationResolver, LocationSlot, LocationWatcher,
    SystemIdentity,
};
use super::server::ServerProfile;
use super::telemetry::{StatsChannel, TelemetryState, TelemetryView};

/// Build the single-worker runtime every view runs on
pub fn build_runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .thread_name("srvmon-worker")
        .build()
        .context("Failed to start async runtime")
}

/// Production pipeline wired from the configured endpoints
pub fn build_resolver(config: &Config) -> anyhow::Result<LocationResolver> {
    let timeout = Duration::from_secs(config.request_timeout_secs);

    let resolver = DohResolver::new(&config.dns_endpoint, timeout)
        .context("Failed to set up DNS resolver")?;
    let locator = IpApiLocator::new(&config.geo_endpoint, timeout)
        .context("Failed to set up geo lookup")?;

    Ok(LocationResolver::new(
        Arc::new(resolver),
        Arc::new(locator),
        Arc::new(SystemIdentity),
    ))
}

/// Websocket endpoint and credentials for the live stats stream
#[derive(Debug, Clone, Default)]
pub struct SocketSettings {
    pub url: Option<String>,
    pub token: Option<String>,
}

/// Something the view should redraw for
#[derive(Debug, Clone)]
pub enum DetailsUpdate {
    Telemetry(TelemetryView),
    Location(Option<LocationRecord>),
}

pub struct DetailsRuntime {
    pub telemetry_rx: watch::Receiver<TelemetryView>,
    pub location_rx: watch::Receiver<Option<LocationRecord>>,

    address_tx: watch::Sender<Option<String>>,
    cancel: CancellationToken,

    /// Keeps the telemetry sender alive when no channel is running
    _telemetry: Arc<TelemetryState>,

    runtime: tokio::runtime::Runtime,
}

impl DetailsRuntime {
    /// Spawn the stats channel (when a socket URL is set) and the location watcher
    pub fn new(
        profile: &ServerProfile,
        socket: SocketSettings,
        resolver: LocationResolver,
    ) -> anyhow::Result<Self> {
        let runtime = build_runtime()?;
        let cancel = CancellationToken::new();

        let telemetry = Arc::new(TelemetryState::new(profile.limits, profile.status));
        let telemetry_rx = telemetry.subscribe();

        let slot = Arc::new(LocationSlot::new());
        let location_rx = slot.subscribe();

        let (address_tx, address_rx) = watch::channel(profile.default_ip().map(str::to_string));

        match socket.url {
            Some(url) => {
                let channel = StatsChannel::new(url, socket.token, Arc::clone(&telemetry));
                runtime.spawn(channel.run(cancel.clone()));
            }
            None => log::info!("No socket URL configured; telemetry stays at zero"),
        }

        let watcher = LocationWatcher::new(resolver, slot);
        runtime.spawn(watcher.run(address_rx, cancel.clone()));

        Ok(Self {
            telemetry_rx,
            location_rx,
            address_tx,
            cancel,
            _telemetry: telemetry,
            runtime,
        })
    }

    /// Change the default address; triggers a new location run
    pub fn set_address(&self, address: Option<String>) {
        self.address_tx.send_replace(address);
    }

    /// Token that tears the view down when cancelled
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Block until telemetry or location changes, or `None` once cancelled
    pub fn wait_for_update(&mut self) -> Option<DetailsUpdate> {
        let cancel = self.cancel.clone();
        let telemetry_rx = &mut self.telemetry_rx;
        let location_rx = &mut self.location_rx;

        self.runtime.block_on(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                Ok(()) = telemetry_rx.changed() => {
                    Some(DetailsUpdate::Telemetry(*telemetry_rx.borrow_and_update()))
                }
                Ok(()) = location_rx.changed() => {
                    Some(DetailsUpdate::Location(location_rx.borrow_and_update().clone()))
                }
                else => None,
            }
        })
    }

    pub fn shutdown(self) {
        log::debug!("Shutting down details runtime");
        self.cancel.cancel();
        self.runtime.shutdown_timeout(Duration::from_secs(1));
    }
}
