use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::api::services::AppState;
use crate::config::get_config;

pub struct StartupContext {
    pub state: AppState,
    pub bind_address: String,
    pub workers: usize,
}

/// 准备服务器启动的上下文
///
/// 根据全局配置构建路由表、provider 注册表和静态资源代理，并提示缺失的配置项。
pub fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let config = get_config();

    let state =
        AppState::with_http_clients(&config).context("Failed to build application state")?;

    state.providers.log_availability();

    if state.assets.is_enabled() {
        info!("Front-end assets proxied from {}", config.assets.url);
    } else {
        warn!("assets.url is empty; page routes will answer 404");
    }

    if !config.edge.enforce_https {
        info!("HTTPS redirect for page routes is disabled");
    }

    debug!(
        "Query prefixes: {:?}, /json provider: {}, query provider: {}",
        config.routes.query_prefixes, config.routes.default_provider, config.routes.query_provider
    );

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        state,
        bind_address: format!("{}:{}", config.server.host, config.server.port),
        workers: config.server.cpu_count,
    })
}
