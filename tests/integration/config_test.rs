// Config persistence

use std::fs;

use srvmon::core::config::{DEFAULT_DNS_ENDPOINT, DEFAULT_REQUEST_TIMEOUT_SECS};
use srvmon::core::server::{Allocation, ServerStatus};
use srvmon::Config;
use tempfile::TempDir;

#[test]
fn test_missing_file_gives_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.dns_endpoint, DEFAULT_DNS_ENDPOINT);
    assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
}

#[test]
fn test_save_and_reload() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.json");

    let mut config = Config::default();
    config
        .set_socket_url("wss://node.example.com:8080/api/servers/1/ws")
        .unwrap();
    config.socket_token = Some("token".to_string());
    config.server.limits.cpu_percent = Some(150);
    config.server.status = Some(ServerStatus::Running);
    config.server.add_allocation(Allocation {
        ip: "203.0.113.7".to_string(),
        port: 25565,
        alias: Some("play.example.net".to_string()),
        is_default: true,
    });

    config.save_to(&path).unwrap();
    let loaded = Config::load_from(&path).unwrap();

    assert_eq!(loaded, config);
    assert_eq!(loaded.server.default_ip(), Some("203.0.113.7"));
    assert_eq!(loaded.server.display_address(), "play.example.net:25565");
}

#[test]
fn test_empty_or_corrupt_file_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");

    fs::write(&path, "   \n").unwrap();
    assert_eq!(Config::load_from(&path).unwrap(), Config::default());

    fs::write(&path, "{ this is not json").unwrap();
    assert_eq!(Config::load_from(&path).unwrap(), Config::default());
}

#[test]
fn test_partial_file_keeps_defaults_for_missing_fields() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");

    fs::write(
        &path,
        r#"{"server":{"allocations":[{"ip":"::1","port":2022,"is_default":true}]}}"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.dns_endpoint, DEFAULT_DNS_ENDPOINT);
    assert_eq!(config.server.display_address(), "[::1]:2022");
    assert_eq!(config.server.default_ip(), Some("::1"));
}
