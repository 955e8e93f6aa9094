//! Configuration management for the New Relic MCP server.
//!
//! Credentials and endpoint settings come from CLI flags, environment
//! variables and an optional TOML file, resolved once at startup into an
//! immutable [`Config`].

use crate::error::{NewRelicError, Result};
use crate::newrelic::DEFAULT_ENDPOINT;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable holding the New Relic user API key.
pub const API_KEY_ENV: &str = "NEW_RELIC_API_KEY";

/// Environment variable holding the New Relic account id.
pub const ACCOUNT_ID_ENV: &str = "NEW_RELIC_ACCOUNT_ID";

/// Environment variable overriding the NerdGraph endpoint.
pub const ENDPOINT_ENV: &str = "NEW_RELIC_API_URL";

/// Default timeout for NerdGraph requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolved runtime configuration.
#[derive(Clone, PartialEq)]
pub struct Config {
    /// New Relic user API key, sent in the `API-Key` header.
    pub api_key: String,
    /// Account the NRQL queries run against.
    pub account_id: String,
    /// NerdGraph endpoint URL.
    pub endpoint: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Config {
    /// Creates a config with the given credentials and default settings.
    pub fn new(api_key: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            account_id: account_id.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Resolves the final configuration.
    ///
    /// Overrides (CLI flags, which already fall back to environment variables)
    /// take precedence over the config file, which takes precedence over
    /// defaults. Fails if either credential ends up empty.
    pub fn resolve(file: &FileConfig, overrides: &ConfigOverrides) -> Result<Self> {
        let section = &file.newrelic;

        let config = Self {
            api_key: pick(&overrides.api_key, &section.api_key).unwrap_or_default(),
            account_id: pick(&overrides.account_id, &section.account_id).unwrap_or_default(),
            endpoint: pick(&overrides.endpoint, &section.endpoint)
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout_secs: overrides
                .timeout_secs
                .or(section.timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks that both credentials are present and the endpoint parses.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(NewRelicError::config(format!("{API_KEY_ENV} is required")));
        }
        if self.account_id.trim().is_empty() {
            return Err(NewRelicError::config(format!(
                "{ACCOUNT_ID_ENV} is required"
            )));
        }
        if self.timeout_secs == 0 {
            return Err(NewRelicError::config("timeout must be at least 1 second"));
        }
        self.endpoint_url()?;
        Ok(())
    }

    /// Parses the configured endpoint.
    pub fn endpoint_url(&self) -> Result<Url> {
        let url = Url::parse(&self.endpoint).map_err(|e| {
            NewRelicError::config(format!("Invalid endpoint '{}': {e}", self.endpoint))
        })?;

        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(NewRelicError::config(format!(
                "Invalid endpoint scheme '{}'. Expected 'https' or 'http'",
                url.scheme()
            )));
        }

        Ok(url)
    }

    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("newrelic-mcp")
            .join("config.toml")
    }
}

/// Returns the override if set and non-empty, otherwise the file value.
fn pick(primary: &Option<String>, fallback: &Option<String>) -> Option<String> {
    primary
        .as_ref()
        .filter(|v| !v.is_empty())
        .or(fallback.as_ref())
        .cloned()
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("account_id", &self.account_id)
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub account_id: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Contents of the TOML config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub newrelic: NewRelicSection,
}

/// The `[newrelic]` table of the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewRelicSection {
    pub api_key: Option<String>,
    pub account_id: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| NewRelicError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            NewRelicError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
