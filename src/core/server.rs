//! Server profile: resource limits, allocations and power status.
//!
//! These values are supplied externally (config file or daemon events) and
//! are read-only to the telemetry and location code.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resource limits of the server. `None` or `0` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLimits {
    #[serde(default)]
    pub cpu_percent: Option<u32>,
    #[serde(default)]
    pub memory_mb: Option<u32>,
    #[serde(default)]
    pub disk_mb: Option<u32>,
}

/// One network allocation (address/port pair) of the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub ip: String,
    pub port: u16,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

/// Power state reported by the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Offline,
    Starting,
    Stopping,
    Running,
}

impl ServerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerStatus::Offline => "offline",
            ServerStatus::Starting => "starting",
            ServerStatus::Stopping => "stopping",
            ServerStatus::Running => "running",
        }
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "offline" => Ok(ServerStatus::Offline),
            "starting" => Ok(ServerStatus::Starting),
            "stopping" => Ok(ServerStatus::Stopping),
            "running" => Ok(ServerStatus::Running),
            other => Err(format!("unknown server status '{}'", other)),
        }
    }
}

/// Everything srvmon knows about the monitored server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerProfile {
    #[serde(default)]
    pub limits: ResourceLimits,
    #[serde(default)]
    pub allocations: Vec<Allocation>,
    #[serde(default)]
    pub status: Option<ServerStatus>,
}

impl ServerProfile {
    /// The first allocation flagged as default
    pub fn default_allocation(&self) -> Option<&Allocation> {
        self.allocations.iter().find(|a| a.is_default)
    }

    /// IP address of the default allocation, the input of location resolution.
    /// A blank IP counts as no address.
    pub fn default_ip(&self) -> Option<&str> {
        self.default_allocation()
            .map(|a| a.ip.trim())
            .filter(|ip| !ip.is_empty())
    }

    /// `alias:port` or `ip:port` of the default allocation, `n/a` without one
    pub fn display_address(&self) -> String {
        match self.default_allocation() {
            Some(allocation) => {
                let host = match &allocation.alias {
                    Some(alias) if !alias.is_empty() => alias.clone(),
                    _ => display_ip(&allocation.ip),
                };
                format!("{}:{}", host, allocation.port)
            }
            None => "n/a".to_string(),
        }
    }

    /// Add an allocation. Flagging it default clears the flag on the others.
    pub fn add_allocation(&mut self, allocation: Allocation) {
        if allocation.is_default {
            for existing in &mut self.allocations {
                existing.is_default = false;
            }
        }
        self.allocations.push(allocation);
    }
}

/// Bracket IPv6 literals so a port can be appended
pub fn display_ip(ip: &str) -> String {
    if ip.contains(':') && !ip.starts_with('[') {
        format!("[{}]", ip)
    } else {
        ip.to_string()
    }
}
