//! Server details view.
//!
//! A terminal dashboard of stat blocks (address, uptime, CPU, memory, disk,
//! network, region) colored by how close each metric is to its limit.

mod app;
pub mod blocks;
mod event_handler;
mod render;
mod widgets;

pub use app::{run_details_app, DetailsApp, DetailsAppConfig};
pub use blocks::{stat_blocks, StatBlock};
pub use event_handler::DetailsEvent;
pub use widgets::severity_color;
