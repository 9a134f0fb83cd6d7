use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::*;
use tokio_util::sync::CancellationToken;

use crate::core::runtime::{build_resolver, build_runtime};
use crate::core::Config;

/// Execute the locate command: one location run on the given or default address
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = Config::load()?;

    let address = matches
        .get_one::<String>("address")
        .cloned()
        .or_else(|| config.server.default_ip().map(str::to_string));

    let Some(address) = address else {
        println!("{}", "no default allocation".yellow());
        println!(
            "{}",
            "Pass an address or add one with 'srvmon config allocation add <ip> <port> --default'"
                .dimmed()
        );
        return Ok(());
    };

    let resolver = build_resolver(&config)?;
    let runtime = build_runtime()?;

    let cancel = CancellationToken::new();
    let handler_cancel = cancel.clone();
    ctrlc::set_handler(move || handler_cancel.cancel())
        .context("Failed to install Ctrl-C handler")?;

    println!("{} {}", "Locating".cyan(), address.bold());
    let record = runtime.block_on(resolver.resolve(Some(&address), &cancel));

    match record {
        Some(record) if record.is_sentinel() => {
            println!(
                "{} {}",
                "✗".red(),
                format!("{}, {} ({})", record.country_name, record.city, record.country_code)
                    .red()
            );
        }
        Some(record) => {
            println!(
                "{} {}, {} {}",
                "✓".green(),
                record.country_name.bold(),
                record.city,
                format!("({})", record.country_code).dimmed()
            );
        }
        None => println!("{}", "Cancelled".yellow()),
    }

    Ok(())
}
