//! Command-line argument parsing for the New Relic MCP server.

use crate::config::{Config, ConfigOverrides, ACCOUNT_ID_ENV, API_KEY_ENV, ENDPOINT_ENV};
use clap::Parser;
use std::path::PathBuf;

/// MCP server exposing New Relic logs and APM data through NRQL tools.
#[derive(Parser, Debug)]
#[command(name = "newrelic-mcp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// New Relic user API key
    #[arg(long, value_name = "KEY", env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// New Relic account id
    #[arg(long, value_name = "ID", env = ACCOUNT_ID_ENV)]
    pub account_id: Option<String>,

    /// NerdGraph endpoint (e.g., https://api.eu.newrelic.com/graphql)
    #[arg(long, value_name = "URL", env = ENDPOINT_ENV)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log filter when RUST_LOG is unset (e.g., "debug", "newrelic_mcp=trace")
    #[arg(long, value_name = "FILTER", default_value = "info")]
    pub log_level: String,

    /// Write logs to a file in the state directory instead of stderr
    #[arg(long)]
    pub log_file: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Collects the values that override the config file.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_key: self.api_key.clone(),
            account_id: self.account_id.clone(),
            endpoint: self.endpoint.clone(),
            timeout_secs: self.timeout,
        }
    }
}
