//! Line-oriented telemetry stream for terminals that can't host the TUI
//! and for scripting (`--json`).

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::*;
use serde::Serialize;

use crate::core::config::validate_endpoint;
use crate::core::network_identity::LocationRecord;
use crate::core::runtime::{build_resolver, DetailsRuntime, DetailsUpdate};
use crate::core::telemetry::{SeverityTier, TelemetryView};
use crate::core::Config;
use crate::ui::details::{stat_blocks, StatBlock};

#[derive(Serialize)]
struct JsonLine<'a> {
    address: &'a str,
    #[serde(flatten)]
    view: &'a TelemetryView,
    location: Option<&'a LocationRecord>,
}

/// Execute the stats command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let json_output = matches.get_flag("json");

    let config = Config::load()?;
    let socket = super::socket_settings(matches, &config);
    match &socket.url {
        Some(url) => {
            validate_endpoint(url, &["ws", "wss"])?;
        }
        None => {
            eprintln!(
                "{}",
                "No socket URL configured. Use --url or 'srvmon config set socket-url <URL>'."
                    .yellow()
            );
        }
    }

    let resolver = build_resolver(&config)?;
    let profile = config.server;
    let address = profile.display_address();

    let mut runtime = DetailsRuntime::new(&profile, socket, resolver)?;

    let cancel = runtime.cancel_token();
    ctrlc::set_handler(move || cancel.cancel()).context("Failed to install Ctrl-C handler")?;

    let mut view = *runtime.telemetry_rx.borrow();
    let mut location: Option<LocationRecord> = None;

    while let Some(update) = runtime.wait_for_update() {
        match update {
            DetailsUpdate::Telemetry(next) => view = next,
            DetailsUpdate::Location(next) => location = next,
        }

        if json_output {
            let line = JsonLine {
                address: &address,
                view: &view,
                location: location.as_ref(),
            };
            println!("{}", serde_json::to_string(&line)?);
        } else {
            println!("{}", format_line(&stat_blocks(&view, &address, location.as_ref())));
        }
    }

    runtime.shutdown();
    Ok(())
}

fn format_line(blocks: &[StatBlock]) -> String {
    blocks
        .iter()
        .map(|block| {
            let mut title = block.title.to_string();
            if let Some(badge) = &block.badge {
                title = format!("{} [{}]", title, badge);
            }
            format!("{}: {}", title.dimmed(), paint(block))
        })
        .collect::<Vec<_>>()
        .join(" │ ")
}

fn paint(block: &StatBlock) -> ColoredString {
    let text = block.text();
    if block.muted {
        return text.bright_black();
    }
    match block.severity {
        SeverityTier::Normal => text.normal(),
        SeverityTier::Warning => text.yellow(),
        SeverityTier::Critical => text.red().bold(),
    }
}
