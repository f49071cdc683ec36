//! Structured Logger
//!
//! Wraps `tracing` to provide a human console layer on stderr, a rolling
//! NDJSON file, and environment-based level control.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Prefix of the daily log files: `snakelens.log.YYYY-MM-DD`.
pub const LOG_FILE_PREFIX: &str = "snakelens.log";

/// Initialize the global structured logger.
///
/// `RUST_LOG` wins over `level`. Stdout is left for rendered results, so the
/// console layer writes to stderr. Calling this twice is harmless.
pub fn init_logger<P: AsRef<Path>>(log_dir: P, level: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    let log_dir = log_dir.as_ref();
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .build(log_dir)
        .with_context(|| format!("Failed to open log directory: {}", log_dir.display()))?;

    // JSON layer for file
    let file_layer = fmt::layer()
        .json()
        .with_writer(file_appender)
        .with_ansi(false);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
    Ok(())
}

/// Console-only logger, for when the log directory is unusable.
pub fn init_console_logger(level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
