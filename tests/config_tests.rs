//! Configuration loading tests
//!
//! Files are written to a temp dir and loaded through the same path the binary uses.

use std::fs;

use geoip_router::config::StaticConfig;
use geoip_router::router::{RouteDecision, RouteTable};
use geoip_router::services::ProviderKind;
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> String {
    let path = dir.path().join("config.toml");
    fs::write(&path, content).expect("Failed to write config");
    path.to_string_lossy().into_owned()
}

#[test]
fn test_load_toml_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[server]
host = "0.0.0.0"
port = 9090
expose_errors = true

[assets]
url = "https://static.example.com/"

[edge]
enforce_https = false

[edge.headers]
connecting_ip = "x-client-ip"

[routes]
query_prefixes = ["lookup"]
default_provider = "ipinfo"

[providers]
timeout_secs = 3

[providers.ipinfo]
token = "abc123"
"#,
    );

    let config = StaticConfig::try_load(Some(&path)).expect("config should load");

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9090);
    assert!(config.server.expose_errors);
    assert_eq!(config.assets.url, "https://static.example.com/");
    assert!(!config.edge.enforce_https);
    assert_eq!(config.edge.headers.connecting_ip, "x-client-ip");
    // 未写出的头名保持默认
    assert_eq!(config.edge.headers.country, "cf-ipcountry");
    assert_eq!(config.routes.query_prefixes, vec!["lookup".to_string()]);
    assert_eq!(config.routes.default_provider, "ipinfo");
    assert_eq!(config.providers.timeout_secs, 3);
    assert_eq!(config.providers.ipinfo.token.as_deref(), Some("abc123"));
    assert!(config.providers.ipgeo.url_template.is_none());
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let config = StaticConfig::try_load(Some(&path.to_string_lossy())).unwrap();

    assert_eq!(config.routes.query_prefixes, vec!["query", "ip"]);
    assert_eq!(config.routes.default_provider, "ipgeo");
    assert_eq!(config.routes.query_provider, "ipdata");
    assert!(config.edge.enforce_https);
    assert!(!config.server.expose_errors);
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[server\nport = ");

    assert!(StaticConfig::try_load(Some(&path)).is_err());
}

#[test]
fn test_loaded_routes_drive_route_table() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[routes]
query_prefixes = ["geo"]
query_provider = "ip2location"
"#,
    );
    let config = StaticConfig::try_load(Some(&path)).unwrap();
    let table = RouteTable::from_config(&config.routes).unwrap();

    assert_eq!(
        table.decide("/geo/1.1.1.1", None),
        RouteDecision::Query {
            provider: ProviderKind::Ip2Location,
            ip: "1.1.1.1".to_string(),
        }
    );
    assert_eq!(table.decide("/query/1.1.1.1", None), RouteDecision::NotFound);
}

#[test]
fn test_unknown_provider_rejected_by_route_table() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[routes]\ndefault_provider = \"maxmind\"\n");
    let config = StaticConfig::try_load(Some(&path)).unwrap();

    assert!(RouteTable::from_config(&config.routes).is_err());
}

#[test]
fn test_saved_sample_loads_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = StaticConfig::default();
    config.server.port = 8181;
    config.providers.ipdata.token = Some("t0k".to_string());
    config.save_to_file(&path).expect("save should create parent dirs");

    let loaded = StaticConfig::try_load(Some(&path.to_string_lossy())).unwrap();
    assert_eq!(loaded.server.port, 8181);
    assert_eq!(loaded.providers.ipdata.token.as_deref(), Some("t0k"));
}
