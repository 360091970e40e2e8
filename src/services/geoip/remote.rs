//! 远程 provider 适配器
//!
//! 所有上游 vendor 共用同一套流程：
//! 1. 选定目标地址（显式查询 IP，或调用方自身地址）
//! 2. 拼接 URL 并发起一次 GET
//! 3. 检查状态码与拒绝标记
//! 4. 解析 JSON、校验必需字段
//! 5. 交给 vendor 的字段映射函数
//!
//! token 和完整 URL 不进入日志。

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, trace, warn};

use super::fetch::{FetchError, HttpFetch};
use super::payload::Payload;
use super::provider::{GeoLookup, ResolveError};
use super::record::GeoRecord;
use super::vendors::{LookupTarget, VendorSpec};
use crate::config::ProviderConfig;
use crate::services::edge::EdgeMetadata;
use crate::utils::ip::{is_private_or_local, parse_ip_literal};

pub struct RemoteProvider {
    spec: &'static VendorSpec,
    url_template: String,
    token: Option<String>,
    fetch: Arc<dyn HttpFetch>,
}

impl RemoteProvider {
    pub fn new(spec: &'static VendorSpec, config: &ProviderConfig, fetch: Arc<dyn HttpFetch>) -> Self {
        let url_template = config
            .url_template
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| spec.url_template.to_string());
        let token = config.token.clone().filter(|t| !t.trim().is_empty());

        Self {
            spec,
            url_template,
            token,
            fetch,
        }
    }

    /// A token is configured.
    pub fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    fn build_url(&self, ip: &str, token: &str) -> String {
        self.url_template
            .replace("{ip}", &urlencoding::encode(ip))
            .replace("{token}", &urlencoding::encode(token))
    }

    fn decode(&self, body: &[u8], target: &LookupTarget<'_>) -> Result<GeoRecord, ResolveError> {
        let text = std::str::from_utf8(body)
            .map_err(|e| ResolveError::Payload(format!("body is not UTF-8: {}", e)))?;

        if text.contains(self.spec.sentinel) {
            return Err(ResolveError::Upstream("vendor rejected the lookup".to_string()));
        }

        let json: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| ResolveError::Payload(format!("invalid JSON: {}", e)))?;
        if !json.is_object() {
            return Err(ResolveError::Payload("payload is not an object".to_string()));
        }

        let payload = Payload::new(&json);
        if let Some(missing) = self.spec.required.iter().find(|path| !payload.has(path)) {
            return Err(ResolveError::Payload(format!(
                "missing field '{}'",
                missing.join(".")
            )));
        }

        Ok((self.spec.normalize)(&payload, target))
    }

    async fn lookup(&self, ip: &str, edge: &EdgeMetadata) -> Result<GeoRecord, ResolveError> {
        let addr = parse_ip_literal(ip)
            .ok_or_else(|| ResolveError::Unavailable(format!("'{}' is not an IP address", ip)))?;
        if is_private_or_local(&addr) {
            return Err(ResolveError::Unavailable(format!(
                "{} is a private or local address",
                ip
            )));
        }

        let token = self
            .token
            .as_deref()
            .ok_or_else(|| ResolveError::Unavailable("no token configured".to_string()))?;

        let url = self.build_url(ip, token);
        let reply = self.fetch.get(&url).await.map_err(|e| match e {
            FetchError::Network(msg) => ResolveError::Upstream(msg),
            FetchError::Internal(msg) => ResolveError::Internal(msg),
        })?;

        if !reply.is_success() {
            return Err(ResolveError::Upstream(format!("HTTP status {}", reply.status)));
        }

        let target = LookupTarget {
            ip,
            own_address: edge.client_ip.as_deref() == Some(ip),
            edge,
        };
        self.decode(&reply.body, &target)
    }
}

#[async_trait]
impl GeoLookup for RemoteProvider {
    async fn resolve(
        &self,
        ip: Option<&str>,
        edge: &EdgeMetadata,
    ) -> Result<GeoRecord, ResolveError> {
        let Some(ip) = ip.or(edge.client_ip.as_deref()) else {
            return Err(ResolveError::Unavailable("no target address".to_string()));
        };

        let result = self.lookup(ip, edge).await;
        match &result {
            Ok(_) => trace!("{} resolved {}", self.name(), ip),
            Err(ResolveError::Unavailable(reason)) => {
                debug!("{} skipped {}: {}", self.name(), ip, reason)
            }
            Err(e) => warn!("{} lookup for {} failed: {}", self.name(), ip, e),
        }
        result
    }

    fn name(&self) -> &'static str {
        self.spec.kind.as_str()
    }
}
