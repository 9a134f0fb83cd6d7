//! Threshold classification of metrics against the server's limits.
//!
//! Each stat block is colored by the ratio of its current value to the
//! configured limit. Metrics without a limit never escalate.

use serde::{Deserialize, Serialize};

use super::snapshot::TelemetrySnapshot;
use crate::core::server::{ResourceLimits, ServerStatus};

const WARNING_RATIO: f64 = 0.8;
const CRITICAL_RATIO: f64 = 0.9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeverityTier {
    #[default]
    Normal,
    Warning,
    Critical,
}

/// Classify `value` against `limit`.
///
/// A missing or zero limit is unbounded and always yields `Normal`.
/// The Critical boundary is exclusive: a ratio of exactly 0.9 is `Warning`.
pub fn classify(value: f64, limit: Option<f64>) -> SeverityTier {
    let limit = match limit {
        Some(limit) if limit != 0.0 => limit,
        _ => return SeverityTier::Normal,
    };

    let ratio = value / limit;
    if ratio > CRITICAL_RATIO {
        SeverityTier::Critical
    } else if ratio > WARNING_RATIO {
        SeverityTier::Warning
    } else {
        SeverityTier::Normal
    }
}

/// Severity of each stat block that carries one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSeverities {
    pub uptime: SeverityTier,
    pub cpu: SeverityTier,
    pub memory: SeverityTier,
    pub disk: SeverityTier,
}

impl MetricSeverities {
    pub fn evaluate(
        snapshot: &TelemetrySnapshot,
        limits: &ResourceLimits,
        status: Option<ServerStatus>,
    ) -> Self {
        Self {
            uptime: status_severity(status),
            cpu: classify(snapshot.cpu_percent, limits.cpu_percent.map(f64::from)),
            // Bytes and megabytes are both scaled to KiB before comparing
            memory: classify(
                snapshot.memory_bytes as f64 / 1024.0,
                limits.memory_mb.map(|mb| f64::from(mb) * 1024.0),
            ),
            disk: classify(
                snapshot.disk_bytes as f64 / 1024.0,
                limits.disk_mb.map(|mb| f64::from(mb) * 1024.0),
            ),
        }
    }
}

/// Running is Normal, Offline is Critical, anything in between is Warning
pub fn status_severity(status: Option<ServerStatus>) -> SeverityTier {
    let score = match status {
        Some(ServerStatus::Running) => 0.0,
        Some(ServerStatus::Offline) => 10.0,
        _ => 9.0,
    };
    classify(score, Some(10.0))
}
