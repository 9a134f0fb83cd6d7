// Command handlers module
pub mod completions;
pub mod config;
pub mod locate;
pub mod stats;
pub mod version;
pub mod watch;

use clap::ArgMatches;

use crate::core::{Config, SocketSettings};

// Re-exports for cleaner imports
pub use locate::execute as locate;
pub use stats::execute as stats;
pub use version::execute as version;
pub use watch::execute as watch;

/// Socket settings from `--url`/`--token`, falling back to the config file
pub fn socket_settings(matches: &ArgMatches, config: &Config) -> SocketSettings {
    SocketSettings {
        url: matches
            .get_one::<String>("url")
            .cloned()
            .or_else(|| config.socket_url.clone()),
        token: matches
            .get_one::<String>("token")
            .cloned()
            .or_else(|| config.socket_token.clone()),
    }
}
