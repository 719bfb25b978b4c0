//! File-based tracing setup.
//!
//! Logs go to `$XDG_STATE_HOME/spritemux/spritemux.log` (default
//! `~/.local/state/spritemux/spritemux.log`) so the terminal preview is never
//! drawn over. The level comes from `SPRITEMUX_LOG` and defaults to `info`.

use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "SPRITEMUX_LOG";
const LOG_FILE_NAME: &str = "spritemux.log";
const DEFAULT_LEVEL: &str = "info";

/// Install the global subscriber.
///
/// The returned guard flushes buffered lines on drop; keep it alive for the
/// whole process.
pub fn init() -> Result<WorkerGuard> {
    let dir = log_dir()?;
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(&dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .try_init()
        .map_err(|e| anyhow!(e))?;

    Ok(guard)
}

/// Checks XDG_STATE_HOME first, falls back to ~/.local/state.
fn log_dir() -> Result<PathBuf> {
    if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(state_home).join("spritemux"));
    }

    if let Some(home_dir) = home::home_dir() {
        return Ok(home_dir.join(".local/state/spritemux"));
    }

    anyhow::bail!("Could not determine state directory")
}
