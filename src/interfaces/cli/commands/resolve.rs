//! One-shot lookup through the same adapters the server uses

use std::sync::Arc;
use std::time::Duration;

use crate::config::StaticConfig;
use crate::errors::GeoRouterError;
use crate::interfaces::cli::CliError;
use crate::services::{EdgeMetadata, ProviderKind, ProviderRegistry, UreqFetch};
use crate::utils::ip::is_valid_ip_literal;

pub async fn resolve(config: &StaticConfig, provider: &str, ip: &str) -> Result<(), CliError> {
    let kind: ProviderKind = provider.parse()?;
    if !is_valid_ip_literal(ip) {
        return Err(CliError::ParseError(format!("'{}' is not an IP address", ip)));
    }

    let fetch = Arc::new(UreqFetch::new(Duration::from_secs(
        config.providers.timeout_secs,
    )));
    let registry = ProviderRegistry::from_config(&config.providers, fetch);
    let Some(lookup) = registry.get(kind) else {
        return Err(CliError::CommandError(format!("Provider {} is not registered", kind)));
    };

    // 命令行没有边缘请求头；cf 只能描述调用方自身
    let edge = EdgeMetadata::default();
    match lookup.resolve(Some(ip), &edge).await {
        Ok(record) => {
            let json = serde_json::to_string_pretty(&record)
                .map_err(|e| CliError::CommandError(e.to_string()))?;
            println!("{}", json);
            Ok(())
        }
        Err(e) => Err(GeoRouterError::from(e).into()),
    }
}
