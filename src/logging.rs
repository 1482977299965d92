//! Logging setup.
//!
//! Structured logs go to the console and to daily-rotated files under the
//! platform data directory (`~/.local/share/platdiff/logs` on Linux).
//! Errors and warnings are duplicated into a separate `error` file so a
//! failed unattended run is easy to inspect. `RUST_LOG` overrides the
//! default `info` level.

use anyhow::{Context as _, Result};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

/// Platform log directory, created on demand.
pub fn log_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().context("Failed to determine data directory")?;
    let log_dir = base_dir.join("platdiff").join("logs");

    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    }

    Ok(log_dir)
}

/// Initialize the tracing subscriber. Call once at startup.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or an appender
/// fails to build.
pub fn init() -> Result<()> {
    let log_dir = log_dir()?;

    let all_logs_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(10)
        .filename_prefix("platdiff")
        .filename_suffix("log")
        .build(&log_dir)
        .context("Failed to create log file appender")?;

    let error_logs_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(10)
        .filename_prefix("error")
        .filename_suffix("log")
        .build(&log_dir)
        .context("Failed to create error log file appender")?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Failed to create env filter")?;

    let stdout_layer = fmt::layer().with_target(true);

    let all_logs_layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(all_logs_appender);

    let error_logs_layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(error_logs_appender)
        .with_filter(EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(all_logs_layer)
        .with(error_logs_layer)
        .init();

    tracing::debug!("logging initialized, log directory: {}", log_dir.display());

    Ok(())
}
