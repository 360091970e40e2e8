//! Execution modes
//!
//! - Server mode (HTTP server, the default)
//! - CLI mode (one-shot commands)

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "server")]
pub use server::run_server;
