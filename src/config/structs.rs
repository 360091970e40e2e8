use serde::{Deserialize, Serialize};

use crate::errors::{GeoRouterError, Result};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 静态配置（从 TOML + 环境变量加载，启动时使用）
///
/// 包含：
/// - server: 监听地址、端口、worker 数量
/// - logging: 日志配置
/// - assets: 静态资源源站
/// - edge: 边缘平台注入的请求头名称
/// - routes: 路由表参数（查询前缀、默认 provider）
/// - providers: 上游 GeoIP 服务的 token 与 URL 模板
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub edge: EdgeConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

/// Flat environment variables understood for compatibility with the worker deployment.
///
/// They win over both the TOML file and the `GR__` prefixed variables.
pub const LEGACY_ENV_KEYS: [(&str, fn(&mut StaticConfig, String)); 5] = [
    ("ASSET_URL", |c, v| c.assets.url = v),
    ("IPINFO_TOKEN", |c, v| c.providers.ipinfo.token = Some(v)),
    ("IPDATA_TOKEN", |c, v| c.providers.ipdata.token = Some(v)),
    ("IPGEO_TOKEN", |c, v| c.providers.ipgeo.token = Some(v)),
    ("IP2LOCATION_TOKEN", |c, v| c.providers.ip2location.token = Some(v)),
];

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：旧版扁平 ENV > GR__ ENV > config.toml > 默认值
    /// ENV 前缀：GR，分隔符：__
    /// 示例：GR__SERVER__PORT=9999
    pub fn try_load(path: Option<&str>) -> Result<Self> {
        use config::{Config, Environment, File};

        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("GR")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("routes.query_prefixes"),
            )
            .build()?;

        let mut config: StaticConfig = settings.try_deserialize()?;
        config.apply_legacy_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// 加载配置，失败时回退到默认值
    pub fn load(path: Option<&str>) -> Self {
        match Self::try_load(path) {
            Ok(config) => {
                let shown = path.unwrap_or(DEFAULT_CONFIG_PATH);
                if std::path::Path::new(shown).exists() {
                    eprintln!("[INFO] Configuration loaded from: {}", shown);
                }
                config
            }
            Err(e) => {
                eprintln!("[ERROR] {}", e);
                Self::default()
            }
        }
    }

    /// Overlay `ASSET_URL` and the `*_TOKEN` variables. Empty values are ignored.
    pub fn apply_legacy_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for (key, apply) in LEGACY_ENV_KEYS {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                apply(self, value);
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("# Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GeoRouterError::serialization(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
    /// 502 诊断响应中是否附带错误详情
    #[serde(default)]
    pub expose_errors: bool,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// 静态资源源站配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// 源站地址，例如 `https://ipaddress.pages.dev`；为空时页面路由返回 404
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
}

/// Edge platform integration.
///
/// The service is expected to sit behind an edge proxy that annotates each request with
/// visitor metadata. Defaults follow Cloudflare's header names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeConfig {
    /// Redirect page requests to HTTPS when no TLS version was observed.
    #[serde(default = "default_enforce_https")]
    pub enforce_https: bool,
    #[serde(default)]
    pub headers: EdgeHeaders,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeHeaders {
    #[serde(default = "default_h_connecting_ip")]
    pub connecting_ip: String,
    #[serde(default = "default_h_country")]
    pub country: String,
    #[serde(default = "default_h_city")]
    pub city: String,
    #[serde(default = "default_h_continent")]
    pub continent: String,
    #[serde(default = "default_h_latitude")]
    pub latitude: String,
    #[serde(default = "default_h_longitude")]
    pub longitude: String,
    #[serde(default = "default_h_region")]
    pub region: String,
    #[serde(default = "default_h_region_code")]
    pub region_code: String,
    #[serde(default = "default_h_postal_code")]
    pub postal_code: String,
    #[serde(default = "default_h_timezone")]
    pub timezone: String,
    #[serde(default = "default_h_asn")]
    pub asn: String,
    #[serde(default = "default_h_as_organization")]
    pub as_organization: String,
    #[serde(default = "default_h_tls_version")]
    pub tls_version: String,
    #[serde(default = "default_h_colo")]
    pub colo: String,
}

/// 路由表配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesConfig {
    /// `/<prefix>/<ip>` 查询路径前缀
    #[serde(default = "default_query_prefixes")]
    pub query_prefixes: Vec<String>,
    /// `/json` 使用的 provider
    #[serde(default = "default_default_provider")]
    pub default_provider: String,
    /// 查询指定 IP 使用的 provider
    #[serde(default = "default_query_provider")]
    pub query_provider: String,
}

/// 上游 provider 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub ipinfo: ProviderConfig,
    #[serde(default)]
    pub ipdata: ProviderConfig,
    #[serde(default)]
    pub ipgeo: ProviderConfig,
    #[serde(default)]
    pub ip2location: ProviderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    #[serde(default)]
    pub token: Option<String>,
    /// Overrides the vendor endpoint. `{ip}` and `{token}` are substituted.
    #[serde(default)]
    pub url_template: Option<String>,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_upstream_timeout() -> u64 {
    10
}

fn default_enforce_https() -> bool {
    true
}

fn default_h_connecting_ip() -> String {
    "cf-connecting-ip".to_string()
}

fn default_h_country() -> String {
    "cf-ipcountry".to_string()
}

fn default_h_city() -> String {
    "cf-ipcity".to_string()
}

fn default_h_continent() -> String {
    "cf-ipcontinent".to_string()
}

fn default_h_latitude() -> String {
    "cf-iplatitude".to_string()
}

fn default_h_longitude() -> String {
    "cf-iplongitude".to_string()
}

fn default_h_region() -> String {
    "cf-region".to_string()
}

fn default_h_region_code() -> String {
    "cf-region-code".to_string()
}

fn default_h_postal_code() -> String {
    "cf-postal-code".to_string()
}

fn default_h_timezone() -> String {
    "cf-timezone".to_string()
}

fn default_h_asn() -> String {
    "cf-asn".to_string()
}

fn default_h_as_organization() -> String {
    "cf-as-organization".to_string()
}

fn default_h_tls_version() -> String {
    "cf-tls-version".to_string()
}

fn default_h_colo() -> String {
    "cf-colo".to_string()
}

fn default_query_prefixes() -> Vec<String> {
    vec!["query".to_string(), "ip".to_string()]
}

fn default_default_provider() -> String {
    "ipgeo".to_string()
}

fn default_query_provider() -> String {
    "ipdata".to_string()
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
            expose_errors: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: default_upstream_timeout(),
        }
    }
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            enforce_https: default_enforce_https(),
            headers: EdgeHeaders::default(),
        }
    }
}

impl Default for EdgeHeaders {
    fn default() -> Self {
        Self {
            connecting_ip: default_h_connecting_ip(),
            country: default_h_country(),
            city: default_h_city(),
            continent: default_h_continent(),
            latitude: default_h_latitude(),
            longitude: default_h_longitude(),
            region: default_h_region(),
            region_code: default_h_region_code(),
            postal_code: default_h_postal_code(),
            timezone: default_h_timezone(),
            asn: default_h_asn(),
            as_organization: default_h_as_organization(),
            tls_version: default_h_tls_version(),
            colo: default_h_colo(),
        }
    }
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            query_prefixes: default_query_prefixes(),
            default_provider: default_default_provider(),
            query_provider: default_query_provider(),
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_upstream_timeout(),
            ipinfo: ProviderConfig::default(),
            ipdata: ProviderConfig::default(),
            ipgeo: ProviderConfig::default(),
            ip2location: ProviderConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = StaticConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.routes.query_prefixes, vec!["query", "ip"]);
        assert_eq!(config.routes.default_provider, "ipgeo");
        assert_eq!(config.routes.query_provider, "ipdata");
        assert!(config.edge.enforce_https);
        assert_eq!(config.edge.headers.connecting_ip, "cf-connecting-ip");
        assert!(config.assets.url.is_empty());
        assert!(config.providers.ipinfo.token.is_none());
    }

    #[test]
    fn test_legacy_env_overlay() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("ASSET_URL", "https://assets.example.com"),
            ("IPINFO_TOKEN", "info-token"),
            ("IPDATA_TOKEN", ""),
            ("IP2LOCATION_TOKEN", "  "),
        ]);

        let mut config = StaticConfig::default();
        config.providers.ipdata.token = Some("from-file".to_string());
        config.apply_legacy_env(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.assets.url, "https://assets.example.com");
        assert_eq!(config.providers.ipinfo.token.as_deref(), Some("info-token"));
        // 空值不覆盖文件中的配置
        assert_eq!(config.providers.ipdata.token.as_deref(), Some("from-file"));
        assert!(config.providers.ip2location.token.is_none());
        assert!(config.providers.ipgeo.token.is_none());
    }

    #[test]
    fn test_every_legacy_key_is_applied() {
        let mut config = StaticConfig::default();
        config.apply_legacy_env(|k| Some(format!("v-{}", k)));

        assert_eq!(config.assets.url, "v-ASSET_URL");
        assert_eq!(config.providers.ipinfo.token.as_deref(), Some("v-IPINFO_TOKEN"));
        assert_eq!(config.providers.ipdata.token.as_deref(), Some("v-IPDATA_TOKEN"));
        assert_eq!(config.providers.ipgeo.token.as_deref(), Some("v-IPGEO_TOKEN"));
        assert_eq!(
            config.providers.ip2location.token.as_deref(),
            Some("v-IP2LOCATION_TOKEN")
        );
    }

    #[test]
    fn test_sample_config_round_trips_through_toml() {
        let sample = StaticConfig::generate_sample_config();
        assert!(sample.contains("[server]"));
        assert!(sample.contains("query_prefixes"));

        let parsed: StaticConfig = toml::from_str(&sample).expect("sample config should parse");
        assert_eq!(parsed.routes.default_provider, "ipgeo");
    }
}
