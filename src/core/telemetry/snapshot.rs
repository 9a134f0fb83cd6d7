use serde::{Deserialize, Serialize};

use crate::error::{Result, SrvmonError};

/// Latest resource usage of the server process
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub memory_bytes: u64,
    /// Absolute CPU usage (100.0 per fully used core)
    pub cpu_percent: f64,
    pub disk_bytes: u64,
    pub uptime_millis: u64,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

/// Wire shape of the `stats` event payload
#[derive(Debug, Deserialize)]
struct StatsPayload {
    memory_bytes: u64,
    cpu_absolute: f64,
    disk_bytes: u64,
    #[serde(default)]
    uptime: Option<u64>,
    network: NetworkPayload,
}

#[derive(Debug, Deserialize)]
struct NetworkPayload {
    rx_bytes: u64,
    tx_bytes: u64,
}

impl From<StatsPayload> for TelemetrySnapshot {
    fn from(payload: StatsPayload) -> Self {
        TelemetrySnapshot {
            memory_bytes: payload.memory_bytes,
            cpu_percent: payload.cpu_absolute,
            disk_bytes: payload.disk_bytes,
            uptime_millis: payload.uptime.unwrap_or(0),
            rx_bytes: payload.network.rx_bytes,
            tx_bytes: payload.network.tx_bytes,
        }
    }
}

/// Parse a raw `stats` payload into a snapshot.
///
/// Byte counters must be non-negative integers; a negative or non-finite
/// CPU value is rejected as well.
pub fn parse_stats(raw: &[u8]) -> Result<TelemetrySnapshot> {
    let payload: StatsPayload = serde_json::from_slice(raw)
        .map_err(|e| SrvmonError::malformed_telemetry(e.to_string()))?;

    if !payload.cpu_absolute.is_finite() || payload.cpu_absolute < 0.0 {
        return Err(SrvmonError::malformed_telemetry(format!(
            "cpu_absolute out of range: {}",
            payload.cpu_absolute
        )));
    }

    Ok(payload.into())
}
