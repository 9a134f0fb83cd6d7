//! Holder of the latest telemetry view.
//!
//! Every update replaces the whole [`TelemetryView`] through a watch channel,
//! so readers never observe a half-applied snapshot.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use super::severity::MetricSeverities;
use super::snapshot::{parse_stats, TelemetrySnapshot};
use crate::core::server::{ResourceLimits, ServerStatus};

/// What the presentation layer reads: the snapshot plus everything derived from it
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TelemetryView {
    pub snapshot: TelemetrySnapshot,
    pub severities: MetricSeverities,
    pub limits: ResourceLimits,
    pub status: Option<ServerStatus>,
    /// When the last valid stats payload arrived
    pub received_at: Option<DateTime<Utc>>,
}

impl TelemetryView {
    fn recompute(&mut self) {
        self.severities = MetricSeverities::evaluate(&self.snapshot, &self.limits, self.status);
    }
}

pub struct TelemetryState {
    view_tx: watch::Sender<TelemetryView>,
}

impl TelemetryState {
    /// Start with an all-zero snapshot
    pub fn new(limits: ResourceLimits, status: Option<ServerStatus>) -> Self {
        let mut view = TelemetryView {
            limits,
            status,
            ..Default::default()
        };
        view.recompute();

        let (view_tx, _) = watch::channel(view);
        Self { view_tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<TelemetryView> {
        self.view_tx.subscribe()
    }

    pub fn current(&self) -> TelemetryView {
        *self.view_tx.borrow()
    }

    /// Apply a raw `stats` payload.
    ///
    /// Malformed input is dropped and the previous snapshot stays in place.
    /// Returns whether the payload was applied.
    pub fn apply_inbound(&self, raw: &[u8]) -> bool {
        let snapshot = match parse_stats(raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::debug!("Dropping stats payload: {}", e);
                return false;
            }
        };

        self.view_tx.send_modify(|view| {
            view.snapshot = snapshot;
            view.received_at = Some(Utc::now());
            view.recompute();
        });
        true
    }

    pub fn set_status(&self, status: Option<ServerStatus>) {
        self.view_tx.send_if_modified(|view| {
            if view.status == status {
                return false;
            }
            view.status = status;
            view.recompute();
            true
        });
    }

    pub fn set_limits(&self, limits: ResourceLimits) {
        self.view_tx.send_modify(|view| {
            view.limits = limits;
            view.recompute();
        });
    }
}
