use anyhow::{anyhow, ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use super::server::ServerProfile;

pub const DEFAULT_DNS_ENDPOINT: &str = "https://dns.google/resolve";
pub const DEFAULT_GEO_ENDPOINT: &str = "https://api.ipapi.is/";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Websocket endpoint of the daemon streaming server stats
    #[serde(default)]
    pub socket_url: Option<String>,
    /// Token sent in the `auth` event after connecting
    #[serde(default)]
    pub socket_token: Option<String>,
    #[serde(default = "default_dns_endpoint")]
    pub dns_endpoint: String,
    #[serde(default = "default_geo_endpoint")]
    pub geo_endpoint: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub server: ServerProfile,
}

fn default_dns_endpoint() -> String {
    DEFAULT_DNS_ENDPOINT.to_string()
}

fn default_geo_endpoint() -> String {
    DEFAULT_GEO_ENDPOINT.to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            socket_url: None,
            socket_token: None,
            dns_endpoint: default_dns_endpoint(),
            geo_endpoint: default_geo_endpoint(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            server: ServerProfile::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let data = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        if data.trim().is_empty() {
            return Ok(Config::default());
        }

        // A corrupted or outdated file falls back to defaults
        Ok(serde_json::from_str(&data).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable config {:?}: {}", config_path, e);
            Config::default()
        }))
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let data = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, data)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("srvmon").join("config.json"))
    }

    pub fn set_socket_url(&mut self, url: &str) -> Result<()> {
        validate_endpoint(url, &["ws", "wss"])?;
        self.socket_url = Some(url.to_string());
        Ok(())
    }

    pub fn set_dns_endpoint(&mut self, url: &str) -> Result<()> {
        validate_endpoint(url, &["http", "https"])?;
        self.dns_endpoint = url.to_string();
        Ok(())
    }

    pub fn set_geo_endpoint(&mut self, url: &str) -> Result<()> {
        validate_endpoint(url, &["http", "https"])?;
        self.geo_endpoint = url.to_string();
        Ok(())
    }

    pub fn set_request_timeout(&mut self, secs: u64) -> Result<()> {
        ensure!(secs > 0, "Request timeout must be at least one second");
        self.request_timeout_secs = secs;
        Ok(())
    }
}

/// Checks that `url` parses, uses one of `schemes` and names a host
pub fn validate_endpoint(url: &str, schemes: &[&str]) -> Result<Url> {
    let parsed = Url::parse(url.trim()).with_context(|| format!("Invalid URL: {}", url))?;

    if !schemes.contains(&parsed.scheme()) {
        return Err(anyhow!(
            "URL must use one of [{}], got: {}",
            schemes.join(", "),
            parsed.scheme()
        ));
    }

    ensure!(parsed.host_str().is_some(), "URL has no hostname");

    Ok(parsed)
}
