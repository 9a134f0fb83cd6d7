// Hand-written adapters for driving the location pipeline without a network

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use srvmon::core::network_identity::{
    GeoLocator, LocalIdentityProvider, LocationRecord, LocationResolver, NameResolver,
    StaticIdentity,
};
use srvmon::ResolutionError;

#[derive(Default)]
pub struct FakeResolver {
    answers: HashMap<String, Result<String, ResolutionError>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeResolver {
    pub fn with(mut self, host: &str, answer: Result<&str, ResolutionError>) -> Self {
        self.answers
            .insert(host.to_string(), answer.map(str::to_string));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl NameResolver for FakeResolver {
    async fn resolve_host(
        &self,
        host: &str,
        cancel: &CancellationToken,
    ) -> Result<String, ResolutionError> {
        self.calls.lock().push(host.to_string());
        if cancel.is_cancelled() {
            return Err(ResolutionError::Cancelled);
        }
        self.answers
            .get(host)
            .cloned()
            .unwrap_or_else(|| Err(ResolutionError::dns("NXDOMAIN")))
    }
}

#[derive(Default)]
pub struct FakeLocator {
    answers: HashMap<String, Result<LocationRecord, ResolutionError>>,
    /// Queries that block until the gate is opened
    gates: HashMap<String, Arc<Notify>>,
    pub calls: Mutex<Vec<String>>,
    pub finished: Arc<Notify>,
    pub completed: AtomicUsize,
}

impl FakeLocator {
    pub fn with(mut self, query: &str, answer: Result<LocationRecord, ResolutionError>) -> Self {
        self.answers.insert(query.to_string(), answer);
        self
    }

    pub fn gated(mut self, query: &str, gate: Arc<Notify>) -> Self {
        self.gates.insert(query.to_string(), gate);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl GeoLocator for FakeLocator {
    async fn lookup(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<LocationRecord, ResolutionError> {
        self.calls.lock().push(query.to_string());

        if let Some(gate) = self.gates.get(query) {
            tokio::select! {
                _ = cancel.cancelled() => return Err(ResolutionError::Cancelled),
                _ = gate.notified() => {}
            }
        }

        let answer = self
            .answers
            .get(query)
            .cloned()
            .unwrap_or_else(|| Err(ResolutionError::geo("no such ip")));

        self.completed.fetch_add(1, Ordering::SeqCst);
        self.finished.notify_one();
        answer
    }
}

pub fn record(city: &str, country: &str, code: &str) -> LocationRecord {
    LocationRecord::new(city, country, code)
}

pub fn resolver(
    dns: Arc<FakeResolver>,
    geo: Arc<FakeLocator>,
    host_name: Option<&str>,
) -> LocationResolver {
    let identity: Arc<dyn LocalIdentityProvider> =
        Arc::new(StaticIdentity(host_name.map(str::to_string)));
    LocationResolver::new(dns, geo, identity)
}
