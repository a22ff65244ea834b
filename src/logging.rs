//! Logging setup.
//!
//! One-shot commands log to stderr. The terminal UI owns the screen, so it
//! logs to a file instead.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Environment variable whose directives replace the configured level.
pub const LOG_ENV: &str = "STEGCHAIN_LOG";

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Installs the global subscriber.
///
/// The returned guard flushes the file writer when dropped; keep it alive
/// for the lifetime of the program.
pub fn init_logging(config: &LogConfig, target: LogTarget) -> Result<Option<WorkerGuard>> {
    let env_directives = std::env::var(LOG_ENV).ok();
    let filter = build_filter(config, env_directives.as_deref());

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))
                .context("Failed to install logger")?;
            Ok(None)
        }
        LogTarget::File(path) => {
            let dir = path
                .parent()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let file_name = path
                .file_name()
                .context("Log file path has no file name")?
                .to_owned();
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(writer)
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))
                .context("Failed to install logger")?;
            Ok(Some(guard))
        }
    }
}

fn build_filter(config: &LogConfig, env_directives: Option<&str>) -> EnvFilter {
    let directives = env_directives
        .filter(|d| !d.trim().is_empty())
        .unwrap_or(config.level.as_str());
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives)
}
