//! Logging setup for sweeper.
//!
//! Logs go to stderr and to a daily rotating file in the platform data
//! directory, ten files retained. When that directory is unavailable only
//! the console layer is installed.
//!
//! ```no_run
//! sweeper::logging::init(false).expect("Failed to initialize logging");
//! tracing::info!("Batch started");
//! ```

use anyhow::{Context as _, Result};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Gets the log directory path based on platform conventions
///
/// Returns:
/// - Windows: `%APPDATA%/sweeper/logs`
/// - macOS: `~/Library/Application Support/sweeper/logs`
/// - Linux: `~/.local/share/sweeper/logs`
pub fn get_log_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().context("Failed to determine data directory")?;
    let log_dir = base_dir.join("sweeper").join("logs");

    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    }

    Ok(log_dir)
}

/// Filter used when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "sweeper=debug,info" } else { "info" }
}

/// Installs the global subscriber. Call once at startup.
///
/// # Errors
///
/// Returns error if the filter is invalid or a subscriber is already set.
pub fn init(verbose: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(verbose)))
        .context("Failed to create env filter")?;

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let file_appender = get_log_dir().and_then(|dir| {
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .max_log_files(10)
            .filename_prefix("sweeper")
            .filename_suffix("log")
            .build(&dir)
            .context("Failed to create file appender")?;
        Ok((dir, appender))
    });

    match file_appender {
        Ok((dir, appender)) => {
            let file_layer = fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_file(true)
                .with_ansi(false)
                .with_writer(appender);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .with(file_layer)
                .try_init()
                .context("Failed to install subscriber")?;

            tracing::debug!("Logging initialized, log directory: {}", dir.display());
        }
        Err(err) => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .try_init()
                .context("Failed to install subscriber")?;

            tracing::warn!("File logging disabled: {err:#}");
        }
    }

    Ok(())
}

/// Gets the path to today's log file
pub fn get_current_log_path() -> Result<PathBuf> {
    let log_dir = get_log_dir()?;
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    Ok(log_dir.join(format!("sweeper.{today}.log")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_naming() -> Result<()> {
        let Ok(path) = get_current_log_path() else {
            // No data directory in this environment.
            return Ok(());
        };
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .context("log path has no file name")?;
        assert!(name.starts_with("sweeper.") && name.ends_with(".log"), "got {name}");
        assert!(path.parent().is_some_and(|p| p.ends_with("logs")));
        Ok(())
    }

    #[test]
    fn test_verbose_directive() {
        assert_eq!(default_directive(false), "info");
        assert!(default_directive(true).contains("sweeper=debug"));
    }
}
