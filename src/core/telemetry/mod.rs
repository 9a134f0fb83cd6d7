//! Live server telemetry.
//!
//! Stats arrive over the daemon websocket, are parsed into snapshots and
//! published together with their severity tiers to the presentation layer.

pub mod channel;
pub mod severity;
mod snapshot;
mod state;

pub use channel::{SocketEvent, SocketMessage, SocketRequest, StatsChannel};
pub use severity::{classify, status_severity, MetricSeverities, SeverityTier};
pub use snapshot::{parse_stats, TelemetrySnapshot};
pub use state::{TelemetryState, TelemetryView};
