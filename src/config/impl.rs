use std::sync::{Arc, OnceLock};

use super::StaticConfig;

static CONFIG: OnceLock<Arc<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Only the binary's startup path reads this. Request handling receives the values it needs
/// through explicitly constructed state.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get()
        .cloned()
        .unwrap_or_else(|| Arc::new(StaticConfig::default()))
}

/// Initialize the global configuration
///
/// Loads configuration from `path` (or "config.toml" in the current directory).
/// If the file doesn't exist, uses in-memory defaults plus environment overrides.
///
/// # Examples
/// ```no_run
/// use geoip_router::config::init_config;
/// init_config(None);
/// ```
pub fn init_config(path: Option<&str>) -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| Arc::new(StaticConfig::load(path)))
        .clone()
}
