//! Connector configuration.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use xdome_client::XdomeClientConfig;
use xdome_core::{BuildOptions, EpochZone};

/// Connector configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectorConfig {
    /// xDome server URL; scheme optional
    pub server_url: String,

    /// API key used as the bearer token
    pub api_key: String,

    /// Verify the server's TLS certificate
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Render integer detection times in real UTC instead of local time
    #[serde(default)]
    pub utc_timestamps: bool,
}

fn default_verify_ssl() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

impl ConnectorConfig {
    /// Configuration with defaults for everything but the server and key.
    #[must_use]
    pub fn new(server_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            api_key: api_key.into(),
            verify_ssl: default_verify_ssl(),
            timeout_secs: default_timeout_secs(),
            utc_timestamps: false,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `XDOME_SERVER_URL`: server URL (required)
    /// - `XDOME_API_KEY`: API key (required)
    /// - `XDOME_VERIFY_SSL`: `true`/`false` (default `true`)
    /// - `XDOME_TIMEOUT_SECS`: request timeout (default `30`)
    /// - `XDOME_UTC_TIMESTAMPS`: `true`/`false` (default `false`)
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or a value does not
    /// parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`ConnectorConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_url = lookup("XDOME_SERVER_URL").ok_or(ConfigError::Missing("XDOME_SERVER_URL"))?;
        let api_key = lookup("XDOME_API_KEY").ok_or(ConfigError::Missing("XDOME_API_KEY"))?;
        let mut config = Self::new(server_url, api_key);

        if let Some(value) = lookup("XDOME_VERIFY_SSL") {
            config.verify_ssl = parse_flag("XDOME_VERIFY_SSL", &value)?;
        }

        if let Some(value) = lookup("XDOME_TIMEOUT_SECS") {
            config.timeout_secs = value.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "XDOME_TIMEOUT_SECS",
                value: value.clone(),
            })?;
        }

        if let Some(value) = lookup("XDOME_UTC_TIMESTAMPS") {
            config.utc_timestamps = parse_flag("XDOME_UTC_TIMESTAMPS", &value)?;
        }

        Ok(config)
    }

    /// Load configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not valid
    /// configuration JSON.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        tracing::info!(path = %path.display(), "Loading config from file");

        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// HTTP client settings.
    #[must_use]
    pub fn client_config(&self) -> XdomeClientConfig {
        XdomeClientConfig {
            server_url: self.server_url.clone(),
            api_key: self.api_key.clone(),
            verify_ssl: self.verify_ssl,
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    /// Payload builder settings.
    #[must_use]
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            epoch_zone: if self.utc_timestamps {
                EpochZone::Utc
            } else {
                EpochZone::Local
            },
            ..BuildOptions::default()
        }
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        }),
    }
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Required variable not set
    #[error("{0} must be set")]
    Missing(&'static str),
    /// Variable set to an unparseable value
    #[error("invalid {key}: '{value}'")]
    Invalid {
        /// Variable name
        key: &'static str,
        /// Offending value
        value: String,
    },
    /// Config file could not be read
    #[error("failed to read {path}: {reason}")]
    Io {
        /// File path
        path: String,
        /// OS error
        reason: String,
    },
    /// Config file is not valid JSON configuration
    #[error("invalid config file: {0}")]
    Parse(String),
}
