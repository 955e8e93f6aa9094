//! Logging configuration for the New Relic MCP server.
//!
//! Stdout carries the protocol, so logs go to stderr or, on request, to a
//! file in the platform state directory.

use std::fs::{self, File};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Builds the filter from `RUST_LOG`, falling back to `default_filter`.
fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Initializes logging to stderr.
pub fn init_stderr_logging(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

/// Initializes logging to a file.
///
/// Location: `~/.local/state/newrelic-mcp/newrelic-mcp.log` on Linux (XDG
/// state directory), or the platform-appropriate state/config directory on
/// other systems. Falls back to stderr if the file cannot be created.
pub fn init_file_logging(default_filter: &str) {
    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Warning: Could not create log directory: {e}");
            init_stderr_logging(default_filter);
            return;
        }
    }

    // Truncate on each run to avoid unbounded growth
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file: {e}");
            init_stderr_logging(default_filter);
            return;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .with_writer(log_file)
        .with_ansi(false)
        .init();
}

/// Returns the path for the log file.
pub fn get_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        return state_dir.join("newrelic-mcp").join("newrelic-mcp.log");
    }

    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("newrelic-mcp").join("newrelic-mcp.log");
    }

    std::env::temp_dir().join("newrelic-mcp.log")
}
