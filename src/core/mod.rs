// Core business logic module

pub mod config;
pub mod network_identity;
pub mod runtime;
pub mod server;
pub mod telemetry;

// Re-export commonly used items
pub use config::Config;
pub use network_identity::{LocationRecord, LocationResolver};
pub use runtime::{DetailsRuntime, DetailsUpdate, SocketSettings};
pub use server::{Allocation, ResourceLimits, ServerProfile, ServerStatus};
pub use telemetry::{SeverityTier, TelemetryView};
