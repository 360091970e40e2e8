//! 路由表
//!
//! 显式的有序匹配器列表，按顺序求值：
//! 1. 查询路径 `/<prefix>/<ip>`（IP 校验通过才算命中）
//! 2. 精确路径表
//! 3. 都不命中 → `NotFound`

use tracing::trace;

use super::decision::RouteDecision;
use crate::config::RoutesConfig;
use crate::errors::{GeoRouterError, Result};
use crate::services::geoip::ProviderKind;
use crate::utils::ip::is_valid_ip_literal;
use crate::utils::user_agent::classify_user_agent;

/// Front-end files served through the asset proxy.
pub const PAGE_PATHS: [&str; 4] = ["/index.html", "/main.css", "/main.js", "/favicon.ico"];

#[derive(Debug, Clone)]
enum Target {
    Fixed(RouteDecision),
    /// `/` depends on who is asking.
    ClientSniff,
}

#[derive(Debug, Clone)]
enum Matcher {
    Query {
        prefix: String,
        provider: ProviderKind,
    },
    Exact {
        path: String,
        target: Target,
    },
}

impl Matcher {
    fn try_match(&self, path: &str, user_agent: Option<&str>) -> Option<RouteDecision> {
        match self {
            Matcher::Query { prefix, provider } => {
                let token = path
                    .strip_prefix('/')?
                    .strip_prefix(prefix.as_str())?
                    .strip_prefix('/')?;
                // `%25` 是 zone 分隔符的编码形式
                let decoded = urlencoding::decode(token).ok()?;
                is_valid_ip_literal(&decoded).then(|| RouteDecision::Query {
                    provider: *provider,
                    ip: decoded.into_owned(),
                })
            }
            Matcher::Exact { path: exact, target } => {
                if path != exact {
                    return None;
                }
                Some(match target {
                    Target::Fixed(decision) => decision.clone(),
                    Target::ClientSniff => {
                        let kind = classify_user_agent(user_agent);
                        if kind.headless {
                            RouteDecision::HeadlessText {
                                change_line: kind.change_line,
                            }
                        } else {
                            RouteDecision::Page
                        }
                    }
                })
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    matchers: Vec<Matcher>,
}

impl RouteTable {
    pub fn from_config(config: &RoutesConfig) -> Result<Self> {
        let default_provider: ProviderKind = config.default_provider.parse()?;
        let query_provider: ProviderKind = config.query_provider.parse()?;

        let mut matchers = Vec::new();

        for prefix in &config.query_prefixes {
            let prefix = prefix.trim().trim_matches('/');
            if prefix.is_empty() || prefix.contains('/') {
                return Err(GeoRouterError::config(format!(
                    "Invalid query prefix '{}': expected a single path segment",
                    prefix
                )));
            }
            matchers.push(Matcher::Query {
                prefix: prefix.to_string(),
                provider: query_provider,
            });
        }

        let mut exact = |path: &str, target: Target| {
            matchers.push(Matcher::Exact {
                path: path.to_string(),
                target,
            })
        };

        exact("/json", Target::Fixed(RouteDecision::Json(default_provider)));
        for kind in ProviderKind::ALL {
            exact(
                &format!("/json/{}", kind.as_str()),
                Target::Fixed(RouteDecision::Json(kind)),
            );
        }
        exact("/cf", Target::Fixed(RouteDecision::EdgeRaw));
        exact("/robots.txt", Target::Fixed(RouteDecision::Robots));
        exact("/", Target::ClientSniff);
        for path in PAGE_PATHS {
            exact(path, Target::Fixed(RouteDecision::Page));
        }

        Ok(Self { matchers })
    }

    /// First matcher wins; `user_agent` only matters for `/`.
    pub fn decide(&self, path: &str, user_agent: Option<&str>) -> RouteDecision {
        let decision = self
            .matchers
            .iter()
            .find_map(|m| m.try_match(path, user_agent))
            .unwrap_or(RouteDecision::NotFound);
        trace!("Route {} -> {}", path, decision);
        decision
    }
}
