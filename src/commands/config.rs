use crate::core::server::{Allocation, ServerStatus};
use crate::core::Config;
use anyhow::{anyhow, ensure, Context, Result};
use colored::Colorize;
use std::str::FromStr;

/// Keys accepted by `srvmon config set`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    SocketUrl,
    SocketToken,
    DnsEndpoint,
    GeoEndpoint,
    Timeout,
    CpuLimit,
    MemoryLimit,
    DiskLimit,
    Status,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 9] = [
        ConfigKey::SocketUrl,
        ConfigKey::SocketToken,
        ConfigKey::DnsEndpoint,
        ConfigKey::GeoEndpoint,
        ConfigKey::Timeout,
        ConfigKey::CpuLimit,
        ConfigKey::MemoryLimit,
        ConfigKey::DiskLimit,
        ConfigKey::Status,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::SocketUrl => "socket-url",
            ConfigKey::SocketToken => "socket-token",
            ConfigKey::DnsEndpoint => "dns-endpoint",
            ConfigKey::GeoEndpoint => "geo-endpoint",
            ConfigKey::Timeout => "timeout",
            ConfigKey::CpuLimit => "cpu-limit",
            ConfigKey::MemoryLimit => "memory-limit",
            ConfigKey::DiskLimit => "disk-limit",
            ConfigKey::Status => "status",
        }
    }

    /// Validate `value` and store it. `none` clears optional keys.
    pub fn apply(&self, config: &mut Config, value: &str) -> Result<()> {
        let value = value.trim();
        let cleared = value.eq_ignore_ascii_case("none");

        match self {
            ConfigKey::SocketUrl if cleared => config.socket_url = None,
            ConfigKey::SocketUrl => config.set_socket_url(value)?,
            ConfigKey::SocketToken if cleared => config.socket_token = None,
            ConfigKey::SocketToken => config.socket_token = Some(value.to_string()),
            ConfigKey::DnsEndpoint => config.set_dns_endpoint(value)?,
            ConfigKey::GeoEndpoint => config.set_geo_endpoint(value)?,
            ConfigKey::Timeout => config.set_request_timeout(parse_number(self, value)?)?,
            ConfigKey::CpuLimit => config.server.limits.cpu_percent = parse_limit(self, value)?,
            ConfigKey::MemoryLimit => config.server.limits.memory_mb = parse_limit(self, value)?,
            ConfigKey::DiskLimit => config.server.limits.disk_mb = parse_limit(self, value)?,
            ConfigKey::Status if cleared => config.server.status = None,
            ConfigKey::Status => {
                config.server.status = Some(ServerStatus::from_str(value).map_err(|e| anyhow!(e))?)
            }
        }

        Ok(())
    }
}

impl FromStr for ConfigKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.name() == s)
            .ok_or_else(|| {
                let names: Vec<_> = ConfigKey::ALL.iter().map(|k| k.name()).collect();
                anyhow!("Unknown key '{}'. Valid keys: {}", s, names.join(", "))
            })
    }
}

fn parse_number<T: FromStr>(key: &ConfigKey, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| anyhow!("{} expects a non-negative whole number, got '{}'", key.name(), value))
}

fn parse_limit(key: &ConfigKey, value: &str) -> Result<Option<u32>> {
    if value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    let limit: u32 = parse_number(key, value)?;
    Ok(Some(limit).filter(|limit| *limit > 0))
}

pub fn execute(matches: &clap::ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("show", _)) => show(),
        Some(("set", sub_matches)) => set(sub_matches),
        Some(("allocation", sub_matches)) => allocation(sub_matches),
        _ => {
            println!("Use 'srvmon config --help' for more information.");
            Ok(())
        }
    }
}

fn show() -> Result<()> {
    let config = Config::load()?;
    let path = Config::get_config_path()?;

    println!("{} {}", "Config file:".bold(), path.display().to_string().dimmed());
    println!();

    let unset = || "not set".dimmed().to_string();
    let limit = |value: Option<u32>, unit: &str| match value {
        Some(value) => format!("{}{}", value, unit),
        None => "∞".to_string(),
    };

    println!("  {:<14} {}", "socket-url", config.socket_url.clone().unwrap_or_else(unset));
    println!(
        "  {:<14} {}",
        "socket-token",
        config
            .socket_token
            .as_ref()
            .map(|_| "********".to_string())
            .unwrap_or_else(unset)
    );
    println!("  {:<14} {}", "dns-endpoint", config.dns_endpoint);
    println!("  {:<14} {}", "geo-endpoint", config.geo_endpoint);
    println!("  {:<14} {}s", "timeout", config.request_timeout_secs);
    println!("  {:<14} {}", "cpu-limit", limit(config.server.limits.cpu_percent, "%"));
    println!("  {:<14} {}", "memory-limit", limit(config.server.limits.memory_mb, " MiB"));
    println!("  {:<14} {}", "disk-limit", limit(config.server.limits.disk_mb, " MiB"));
    println!(
        "  {:<14} {}",
        "status",
        config
            .server
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(unset)
    );

    println!();
    if config.server.allocations.is_empty() {
        println!("{}", "No allocations configured".dimmed());
    } else {
        println!("{}", "Allocations:".bold());
        for allocation in &config.server.allocations {
            let marker = if allocation.is_default {
                "*".green().to_string()
            } else {
                " ".to_string()
            };
            let alias = allocation
                .alias
                .as_ref()
                .map(|alias| format!(" ({})", alias))
                .unwrap_or_default();
            println!("  {} {}:{}{}", marker, allocation.ip, allocation.port, alias);
        }
    }

    Ok(())
}

fn set(matches: &clap::ArgMatches) -> Result<()> {
    let key: ConfigKey = matches
        .get_one::<String>("key")
        .context("Key argument is required")?
        .parse()?;
    let value = matches
        .get_one::<String>("value")
        .context("Value argument is required")?;

    let mut config = Config::load()?;
    key.apply(&mut config, value)?;
    config.save()?;

    println!("{} {} updated", "✓".green(), key.name().bold());
    Ok(())
}

fn allocation_ip(raw: &str) -> Result<String> {
    let ip = raw.trim();
    ensure!(!ip.is_empty(), "IP address must not be empty");
    Ok(ip.to_string())
}

fn allocation(matches: &clap::ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("add", sub_matches)) => {
            let ip = allocation_ip(
                sub_matches
                    .get_one::<String>("ip")
                    .context("IP argument is required")?,
            )?;
            let port = *sub_matches
                .get_one::<u16>("port")
                .context("Port argument is required")?;

            let mut config = Config::load()?;
            // The first allocation becomes the default either way
            let is_default = sub_matches.get_flag("default") || config.server.allocations.is_empty();

            config.server.add_allocation(Allocation {
                ip: ip.clone(),
                port,
                alias: sub_matches.get_one::<String>("alias").cloned(),
                is_default,
            });
            config.save()?;

            let suffix = if is_default { " (default)" } else { "" };
            println!("{} Added {}:{}{}", "✓".green(), ip, port, suffix);
            Ok(())
        }
        Some(("clear", _)) => {
            let mut config = Config::load()?;
            let removed = config.server.allocations.len();
            config.server.allocations.clear();
            config.save()?;

            println!("{} Removed {} allocation(s)", "✓".green(), removed);
            Ok(())
        }
        _ => {
            println!("Use 'srvmon config allocation --help' for more information.");
            Ok(())
        }
    }
}
