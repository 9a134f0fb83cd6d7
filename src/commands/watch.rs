//! Live server details dashboard.

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::config::validate_endpoint;
use crate::core::runtime::build_resolver;
use crate::core::Config;
use crate::ui::details::{run_details_app, DetailsAppConfig};

/// Execute the watch command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = Config::load()?;
    let socket = super::socket_settings(matches, &config);

    if let Some(url) = &socket.url {
        validate_endpoint(url, &["ws", "wss"])?;
    }

    let app_config = DetailsAppConfig {
        resolver: build_resolver(&config)?,
        profile: config.server,
        socket,
    };

    run_details_app(app_config).context("Failed to run server details view")
}
