//! Provider registry
//!
//! Builds one adapter per `ProviderKind` at startup; the HTTP layer looks them up by
//! the kind a route decision names.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use super::fetch::HttpFetch;
use super::provider::{GeoLookup, ProviderKind};
use super::remote::RemoteProvider;
use super::vendors::vendor_spec;
use crate::config::{ProviderConfig, ProvidersConfig};
use crate::services::edge::EdgeProvider;

#[derive(Clone)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderKind, Arc<dyn GeoLookup>>,
    configured: HashMap<ProviderKind, bool>,
}

impl ProviderRegistry {
    pub fn from_config(config: &ProvidersConfig, fetch: Arc<dyn HttpFetch>) -> Self {
        let mut providers: HashMap<ProviderKind, Arc<dyn GeoLookup>> = HashMap::new();
        let mut configured = HashMap::new();

        for kind in ProviderKind::ALL {
            match vendor_spec(kind) {
                Some(spec) => {
                    let remote =
                        RemoteProvider::new(spec, provider_config(config, kind), Arc::clone(&fetch));
                    configured.insert(kind, remote.is_configured());
                    providers.insert(kind, Arc::new(remote));
                }
                None => {
                    configured.insert(kind, true);
                    providers.insert(kind, Arc::new(EdgeProvider));
                }
            }
        }

        let registry = Self {
            providers,
            configured,
        };
        debug!("Provider registry built: {}", registry.summary());
        registry
    }

    pub fn get(&self, kind: ProviderKind) -> Option<Arc<dyn GeoLookup>> {
        self.providers.get(&kind).cloned()
    }

    /// Whether `kind` can produce records at all (remote vendors need a token).
    pub fn is_configured(&self, kind: ProviderKind) -> bool {
        self.configured.get(&kind).copied().unwrap_or(false)
    }

    /// `ipinfo=on ipdata=off ...` in `ProviderKind::ALL` order.
    pub fn summary(&self) -> String {
        ProviderKind::ALL
            .iter()
            .map(|kind| {
                let state = if self.is_configured(*kind) { "on" } else { "off" };
                format!("{}={}", kind, state)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// 启动时提示哪些 provider 缺少 token
    pub fn log_availability(&self) {
        for kind in ProviderKind::ALL {
            if self.is_configured(kind) {
                info!("Provider {} ready", kind);
            } else {
                info!("Provider {} has no token; lookups will return null", kind);
            }
        }
    }
}

fn provider_config(config: &ProvidersConfig, kind: ProviderKind) -> &ProviderConfig {
    match kind {
        ProviderKind::IpInfo => &config.ipinfo,
        ProviderKind::IpData => &config.ipdata,
        ProviderKind::IpGeo => &config.ipgeo,
        // Edge 没有上游配置，调用方不会走到这里
        ProviderKind::Ip2Location | ProviderKind::Edge => &config.ip2location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::geoip::fetch::{FetchError, HttpReply};
    use async_trait::async_trait;

    struct NoFetch;

    #[async_trait]
    impl HttpFetch for NoFetch {
        async fn get(&self, _url: &str) -> Result<HttpReply, FetchError> {
            Err(FetchError::Network("offline".to_string()))
        }
    }

    fn config_with_ipdata_token() -> ProvidersConfig {
        let mut config = ProvidersConfig::default();
        config.ipdata.token = Some("token".to_string());
        config.ipgeo.token = Some("   ".to_string());
        config
    }

    #[test]
    fn test_registry_has_every_kind() {
        let registry = ProviderRegistry::from_config(&config_with_ipdata_token(), Arc::new(NoFetch));
        for kind in ProviderKind::ALL {
            let provider = registry.get(kind).unwrap();
            assert_eq!(provider.name(), kind.as_str());
        }
    }

    #[test]
    fn test_registry_configured_flags() {
        let registry = ProviderRegistry::from_config(&config_with_ipdata_token(), Arc::new(NoFetch));

        assert!(registry.is_configured(ProviderKind::Edge));
        assert!(registry.is_configured(ProviderKind::IpData));
        // 空白 token 视为未配置
        assert!(!registry.is_configured(ProviderKind::IpGeo));
        assert!(!registry.is_configured(ProviderKind::IpInfo));
        assert_eq!(
            registry.summary(),
            "cf=on ipinfo=off ipdata=on ipgeo=off ip2location=off"
        );
    }
}
