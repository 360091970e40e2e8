use tokio::signal;
use tracing::{info, warn};

/// Grace period for in-flight requests once a signal arrives (seconds).
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Resolve on Ctrl+C, or SIGTERM on unix.
pub async fn listen_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!(
        "Shutdown signal received, draining connections (up to {}s)...",
        SHUTDOWN_TIMEOUT_SECS
    );
}
