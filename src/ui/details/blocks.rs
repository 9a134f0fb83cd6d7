//! Text content of the stat blocks, shared by every renderer.

use serde::Serialize;

use crate::core::network_identity::LocationRecord;
use crate::core::server::ServerStatus;
use crate::core::telemetry::{SeverityTier, TelemetryView};
use crate::ui::formatters::{bytes_to_string, capitalize, format_uptime, mb_to_bytes};

const OFFLINE: &str = "Offline";
const UNBOUNDED: &str = "∞";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatBlock {
    pub title: &'static str,
    pub value: String,
    /// Rendered after the value as ` / {limit}`
    pub limit: Option<String>,
    /// Short tag shown next to the title (the region's country code)
    pub badge: Option<String>,
    pub severity: SeverityTier,
    /// Whether `value` is a placeholder rather than a reading
    pub muted: bool,
}

impl StatBlock {
    fn new(title: &'static str, value: impl Into<String>) -> Self {
        Self {
            title,
            value: value.into(),
            limit: None,
            badge: None,
            severity: SeverityTier::Normal,
            muted: false,
        }
    }

    fn offline(title: &'static str) -> Self {
        Self {
            muted: true,
            ..Self::new(title, OFFLINE)
        }
    }

    fn with_limit(mut self, limit: Option<String>) -> Self {
        self.limit = Some(limit.unwrap_or_else(|| UNBOUNDED.to_string()));
        self
    }

    fn with_severity(mut self, severity: SeverityTier) -> Self {
        self.severity = severity;
        self
    }

    /// `value` plus the limit suffix, as a single line
    pub fn text(&self) -> String {
        match &self.limit {
            Some(limit) => format!("{} / {}", self.value, limit),
            None => self.value.clone(),
        }
    }
}

/// Build the blocks in display order.
///
/// The Region block only appears once a location (real or sentinel) exists.
pub fn stat_blocks(
    view: &TelemetryView,
    address: &str,
    location: Option<&LocationRecord>,
) -> Vec<StatBlock> {
    let snapshot = &view.snapshot;
    let offline = view.status == Some(ServerStatus::Offline);

    let mut blocks = Vec::with_capacity(8);
    blocks.push(StatBlock::new("Address", address));

    let uptime = match view.status {
        None => StatBlock::offline("Uptime"),
        Some(_) if snapshot.uptime_millis > 0 => {
            StatBlock::new("Uptime", format_uptime(snapshot.uptime_millis / 1000))
        }
        Some(status) => StatBlock::new("Uptime", capitalize(status.as_str())),
    };
    blocks.push(uptime.with_severity(view.severities.uptime));

    let cpu = if offline {
        StatBlock::offline("CPU Load")
    } else {
        StatBlock::new("CPU Load", format!("{:.2}%", snapshot.cpu_percent))
            .with_limit(
                view.limits
                    .cpu_percent
                    .filter(|cpu| *cpu > 0)
                    .map(|cpu| format!("{}%", cpu)),
            )
    };
    blocks.push(cpu.with_severity(view.severities.cpu));

    let memory = if offline {
        StatBlock::offline("Memory")
    } else {
        StatBlock::new("Memory", bytes_to_string(snapshot.memory_bytes))
            .with_limit(mb_limit(view.limits.memory_mb))
    };
    blocks.push(memory.with_severity(view.severities.memory));

    blocks.push(
        StatBlock::new("Disk", bytes_to_string(snapshot.disk_bytes))
            .with_limit(mb_limit(view.limits.disk_mb))
            .with_severity(view.severities.disk),
    );

    for (title, bytes) in [
        ("Network (Inbound)", snapshot.rx_bytes),
        ("Network (Outbound)", snapshot.tx_bytes),
    ] {
        blocks.push(if offline {
            StatBlock::offline(title)
        } else {
            StatBlock::new(title, bytes_to_string(bytes))
        });
    }

    if let Some(location) = location {
        let mut region = StatBlock::new(
            "Region",
            format!("{}, {}", location.country_name, location.city),
        );
        region.badge = Some(location.country_code.clone());
        region.muted = location.is_sentinel();
        blocks.push(region);
    }

    blocks
}

/// Zero means unlimited
fn mb_limit(limit: Option<u32>) -> Option<String> {
    limit
        .filter(|mb| *mb > 0)
        .map(|mb| bytes_to_string(mb_to_bytes(mb)))
}
