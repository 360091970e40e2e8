//! GeoIP 服务模块
//!
//! 提供 IP 地址地理位置查询功能，支持：
//! - 边缘平台请求元数据（零外部请求）
//! - ipinfo / ipdata / ipgeolocation / ip2location 四个上游 API

pub mod fetch;
pub mod payload;
mod provider;
mod record;
mod registry;
mod remote;
pub mod vendors;

pub use fetch::{FetchError, HttpFetch, HttpReply, UreqFetch};
pub use provider::{GeoLookup, ProviderKind, ResolveError};
pub use record::GeoRecord;
pub use registry::ProviderRegistry;
pub use remote::RemoteProvider;
