//! Log file setup
//!
//! The terminal belongs to the TUI, so tracing output goes to a file.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{project_dirs, LoggingConfig};

/// Environment variable that overrides the configured filter
pub const LOG_ENV_VAR: &str = "HAVADURUMU_LOG";

/// Default log file inside the XDG cache directory
pub fn default_log_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().join("havadurumu.log"))
}

/// Picks the log file: command line first, then config, then the default
pub fn resolve_log_path(config: &LoggingConfig, cli_path: Option<&Path>) -> Option<PathBuf> {
    cli_path
        .map(Path::to_path_buf)
        .or_else(|| config.file.clone())
        .or_else(default_log_path)
}

/// Builds the event filter from `HAVADURUMU_LOG` or the configured level
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber writing to the log file.
///
/// Returns the path being written, or `None` when logging could not be set
/// up; the application runs either way.
pub fn init(config: &LoggingConfig, cli_path: Option<&Path>) -> Option<PathBuf> {
    let path = resolve_log_path(config, cli_path)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(&config.level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(path)
}
