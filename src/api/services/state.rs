use std::sync::Arc;
use std::time::Duration;

use crate::config::{EdgeConfig, StaticConfig};
use crate::errors::Result;
use crate::router::RouteTable;
use crate::services::{AssetProxy, HttpFetch, ProviderRegistry, UreqFetch};

/// Everything a request handler needs, built once at startup.
///
/// Provider tokens live inside the registry; handlers never read global config.
pub struct AppState {
    pub routes: RouteTable,
    pub providers: ProviderRegistry,
    pub assets: AssetProxy,
    pub edge: EdgeConfig,
    /// Append internal error detail to 502 bodies.
    pub expose_errors: bool,
}

impl AppState {
    pub fn from_config(
        config: &StaticConfig,
        provider_fetch: Arc<dyn HttpFetch>,
        asset_fetch: Arc<dyn HttpFetch>,
    ) -> Result<Self> {
        Ok(Self {
            routes: RouteTable::from_config(&config.routes)?,
            providers: ProviderRegistry::from_config(&config.providers, provider_fetch),
            assets: AssetProxy::new(&config.assets.url, asset_fetch),
            edge: config.edge.clone(),
            expose_errors: config.server.expose_errors,
        })
    }

    /// Real HTTP clients with the configured timeouts.
    pub fn with_http_clients(config: &StaticConfig) -> Result<Self> {
        let provider_fetch = Arc::new(UreqFetch::new(Duration::from_secs(
            config.providers.timeout_secs,
        )));
        let asset_fetch = Arc::new(UreqFetch::new(Duration::from_secs(
            config.assets.timeout_secs,
        )));
        Self::from_config(config, provider_fetch, asset_fetch)
    }
}
