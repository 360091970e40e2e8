//! Server mode
//!
//! One catch-all service: every path goes to the dispatcher, which consults the route
//! table itself.

use actix_web::{App, HttpServer, middleware::Compress, web};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::middleware::{RequestIdMiddleware, TimingMiddleware};
use crate::api::services::DispatchService;
use crate::runtime::lifetime;

/// Upper bound on worker threads regardless of `server.cpu_count`.
const MAX_WORKERS: usize = 32;

/// Run the HTTP server until a shutdown signal arrives.
///
/// **Note**: Logging must be initialized before calling this function.
pub async fn run_server() -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup().map_err(|e| {
        tracing::error!("Server startup failed: {}", e);
        e
    })?;

    let workers = startup.workers.clamp(1, MAX_WORKERS);
    info!("Using {} worker threads", workers);

    let state = web::Data::new(startup.state);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(TimingMiddleware)
            // 最外层：后续中间件和 handler 都在 request span 内
            .wrap(RequestIdMiddleware)
            .app_data(state.clone())
            .default_service(web::to(DispatchService::handle))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .shutdown_timeout(lifetime::shutdown::SHUTDOWN_TIMEOUT_SECS)
    .disable_signals()
    .workers(workers)
    .bind(&startup.bind_address)
    .with_context(|| format!("Failed to bind {}", startup.bind_address))?
    .run();

    warn!("Starting server at http://{}", startup.bind_address);

    let handle = server.handle();
    actix_web::rt::spawn(async move {
        lifetime::shutdown::listen_for_shutdown().await;
        handle.stop(true).await;
    });

    server.await?;
    info!("Server stopped");
    Ok(())
}
