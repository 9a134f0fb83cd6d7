// UI and formatting module

pub mod details;
pub mod formatters;

// Re-export commonly used items for cleaner imports
pub use formatters::{bytes_to_string, capitalize, format_uptime, mb_to_bytes};
