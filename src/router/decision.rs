use std::fmt;

use crate::services::geoip::ProviderKind;

/// The single handler chosen for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// `/<prefix>/<ip>`: resolve an explicit address.
    Query { provider: ProviderKind, ip: String },
    /// `/json[/<provider>]`: resolve the caller's own address.
    Json(ProviderKind),
    /// `/cf`: edge metadata as received.
    EdgeRaw,
    Robots,
    /// Script or tool on `/`: plain-text client IP.
    HeadlessText { change_line: bool },
    /// Front-end page or asset.
    Page,
    NotFound,
}

impl fmt::Display for RouteDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteDecision::Query { provider, ip } => write!(f, "query {} via {}", ip, provider),
            RouteDecision::Json(provider) => write!(f, "json (caller) via {}", provider),
            RouteDecision::EdgeRaw => f.write_str("edge metadata"),
            RouteDecision::Robots => f.write_str("robots.txt"),
            RouteDecision::HeadlessText { change_line } => {
                write!(f, "headless client ip (newline: {})", change_line)
            }
            RouteDecision::Page => f.write_str("page"),
            RouteDecision::NotFound => f.write_str("not found"),
        }
    }
}
