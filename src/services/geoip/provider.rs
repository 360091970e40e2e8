//! GeoIP Provider 抽象层
//!
//! 每个 provider 都实现同一个 `GeoLookup` 接口：
//! - `ip` 为 `None` 时解析调用方自己的地址（来自边缘平台注入的请求头）
//! - 失败统一返回 `ResolveError`，由 HTTP 层决定响应形态

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use super::record::GeoRecord;
use crate::errors::GeoRouterError;
use crate::services::edge::EdgeMetadata;

/// GeoIP 查询 trait
#[async_trait]
pub trait GeoLookup: Send + Sync {
    /// 查询地理位置
    ///
    /// `ip` 为 `None` 时使用 `edge.client_ip`
    async fn resolve(
        &self,
        ip: Option<&str>,
        edge: &EdgeMetadata,
    ) -> Result<GeoRecord, ResolveError>;

    /// 获取 provider 名称（用于日志）
    fn name(&self) -> &'static str;
}

/// Why a lookup produced no record.
///
/// Everything except `Internal` is an expected "no data" outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Provider cannot be asked: no token, no usable target address.
    Unavailable(String),
    /// Network failure, non-2xx status or a vendor rejection sentinel.
    Upstream(String),
    /// Body was not JSON or lacked a field the mapping needs.
    Payload(String),
    /// The adapter itself broke.
    Internal(String),
}

impl ResolveError {
    pub fn is_internal(&self) -> bool {
        matches!(self, ResolveError::Internal(_))
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::Unavailable(msg) => write!(f, "unavailable: {}", msg),
            ResolveError::Upstream(msg) => write!(f, "upstream failure: {}", msg),
            ResolveError::Payload(msg) => write!(f, "bad payload: {}", msg),
            ResolveError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for ResolveError {}

impl From<ResolveError> for GeoRouterError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Unavailable(msg) => GeoRouterError::NotFound(msg),
            ResolveError::Upstream(msg) | ResolveError::Internal(msg) => {
                GeoRouterError::Upstream(msg)
            }
            ResolveError::Payload(msg) => GeoRouterError::Payload(msg),
        }
    }
}

/// 所有可路由的 provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// 边缘平台自带的请求元数据，不发起外部请求
    Edge,
    IpInfo,
    IpData,
    IpGeo,
    Ip2Location,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 5] = [
        ProviderKind::Edge,
        ProviderKind::IpInfo,
        ProviderKind::IpData,
        ProviderKind::IpGeo,
        ProviderKind::Ip2Location,
    ];

    /// Name used in `/json/<name>` and in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Edge => "cf",
            ProviderKind::IpInfo => "ipinfo",
            ProviderKind::IpData => "ipdata",
            ProviderKind::IpGeo => "ipgeo",
            ProviderKind::Ip2Location => "ip2location",
        }
    }

    pub fn is_remote(&self) -> bool {
        !matches!(self, ProviderKind::Edge)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = GeoRouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cf" | "edge" => Ok(ProviderKind::Edge),
            "ipinfo" => Ok(ProviderKind::IpInfo),
            "ipdata" => Ok(ProviderKind::IpData),
            "ipgeo" | "ipgeolocation" => Ok(ProviderKind::IpGeo),
            "ip2location" => Ok(ProviderKind::Ip2Location),
            _ => Err(GeoRouterError::validation(format!(
                "Unknown provider: '{}'. Valid: cf, ipinfo, ipdata, ipgeo, ip2location",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_names_round_trip() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.as_str().parse::<ProviderKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_provider_kind_aliases() {
        assert_eq!("edge".parse::<ProviderKind>().unwrap(), ProviderKind::Edge);
        assert_eq!(" IPGeo ".parse::<ProviderKind>().unwrap(), ProviderKind::IpGeo);
        assert!("maxmind".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_only_internal_errors_are_internal() {
        assert!(ResolveError::Internal("x".into()).is_internal());
        assert!(!ResolveError::Upstream("x".into()).is_internal());
        assert!(!ResolveError::Payload("x".into()).is_internal());
        assert!(!ResolveError::Unavailable("x".into()).is_internal());
    }
}
