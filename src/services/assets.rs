//! 前端静态资源代理
//!
//! 页面请求（`/`、`/index.html`、`/main.css` 等）不在本地打包，而是原样转发到
//! `assets.url` 指向的静态站点。

use std::sync::Arc;

use tracing::debug;

use crate::services::geoip::{FetchError, HttpFetch, HttpReply};

pub struct AssetProxy {
    base_url: String,
    fetch: Arc<dyn HttpFetch>,
}

impl AssetProxy {
    pub fn new(base_url: &str, fetch: Arc<dyn HttpFetch>) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            fetch,
        }
    }

    /// An asset origin is configured.
    pub fn is_enabled(&self) -> bool {
        !self.base_url.is_empty()
    }

    /// `GET {base}{path}`; `None` when no origin is configured.
    pub async fn fetch(&self, path: &str) -> Option<Result<HttpReply, FetchError>> {
        if !self.is_enabled() {
            return None;
        }
        let url = format!("{}{}", self.base_url, path);
        debug!("Proxying asset {}", path);
        Some(self.fetch.get(&url).await)
    }
}

/// HTTPS form of the current request URL, host, path and query preserved.
pub fn https_location(host: &str, path: &str, query: &str) -> String {
    if query.is_empty() {
        format!("https://{}{}", host, path)
    } else {
        format!("https://{}{}?{}", host, path, query)
    }
}
