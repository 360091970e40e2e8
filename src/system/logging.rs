//! Logging system initialization
//!
//! Console or file output, text or JSON format, optional daily rotation. The writer is
//! non-blocking; keep the returned guard alive until exit so buffered lines are flushed.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;

use crate::config::LoggingConfig;
use crate::errors::{GeoRouterError, Result};

const DEFAULT_LOG_NAME: &str = "geoip-router.log";

/// Where log lines go.
#[derive(Debug, PartialEq, Eq)]
enum LogTarget<'a> {
    Stdout,
    Rolling { dir: &'a Path, prefix: &'a str },
    File(&'a str),
}

fn log_target(config: &LoggingConfig) -> LogTarget<'_> {
    let Some(log_file) = config.file.as_deref().filter(|f| !f.is_empty()) else {
        return LogTarget::Stdout;
    };
    if !config.enable_rotation {
        return LogTarget::File(log_file);
    }

    let path = Path::new(log_file);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(DEFAULT_LOG_NAME);
    LogTarget::Rolling {
        dir,
        prefix: name.trim_end_matches(".log"),
    }
}

/// Initialize the global subscriber. Call once, after configuration is loaded.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let target = log_target(config);
    let to_console = target == LogTarget::Stdout;

    let writer: Box<dyn std::io::Write + Send + Sync> = match target {
        LogTarget::Stdout => Box::new(std::io::stdout()),
        LogTarget::Rolling { dir, prefix } => Box::new(
            rolling::Builder::new()
                .rotation(rolling::Rotation::DAILY)
                .filename_prefix(prefix)
                .filename_suffix("log")
                .max_log_files(config.max_backups.max(1) as usize)
                .build(dir)
                .map_err(|e| {
                    GeoRouterError::file_operation(format!(
                        "Failed to create rolling log appender in {}: {}",
                        dir.display(),
                        e
                    ))
                })?,
        ),
        LogTarget::File(file) => Box::new(
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
                .map_err(|e| {
                    GeoRouterError::file_operation(format!(
                        "Failed to open log file {}: {}",
                        file, e
                    ))
                })?,
        ),
    };

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level).map_err(|e| {
        GeoRouterError::config(format!("Invalid log level '{}': {}", config.level, e))
    })?;

    let builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(to_console);

    let installed = if config.format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| GeoRouterError::config(format!("Logging already initialized: {}", e)))?;

    Ok(guard)
}
