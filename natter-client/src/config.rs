//! Client-side configuration loading
//!
//! Loads server address, username and timeouts from
//! `~/.config/natter/config.toml`. Every field is optional.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use natter_utils::{NatterError, Result};

use crate::session::{SessionConfig, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_USERNAME};

/// Contents of the config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server: ServerConfig,
    pub user: UserConfig,
    pub timeouts: TimeoutConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub name: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_USERNAME.into(),
        }
    }
}

/// Timeouts in milliseconds; absent or 0 means no timeout
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub connect_ms: Option<u64>,
    pub read_ms: Option<u64>,
    pub write_ms: Option<u64>,
}

fn millis(value: Option<u64>) -> Option<Duration> {
    value.filter(|ms| *ms > 0).map(Duration::from_millis)
}

impl ClientConfig {
    /// Parse config file contents
    pub fn from_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| NatterError::ConfigInvalid {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Build the settings for a session
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            host: self.server.host.clone(),
            port: self.server.port,
            username: self.user.name.clone(),
            connect_timeout: millis(self.timeouts.connect_ms),
            read_timeout: millis(self.timeouts.read_ms),
            write_timeout: millis(self.timeouts.write_ms),
        }
    }
}

/// Load the config file
///
/// Returns defaults if the file doesn't exist or can't be parsed.
pub fn load_config(path: &Path) -> ClientConfig {
    if !path.exists() {
        tracing::debug!("Config file {} not found, using defaults", path.display());
        return ClientConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match ClientConfig::from_toml(&content, path) {
            Ok(config) => {
                tracing::debug!(
                    "Loaded config: host={}, port={}, user={}",
                    config.server.host,
                    config.server.port,
                    config.user.name
                );
                config
            }
            Err(e) => {
                tracing::warn!("{}, using defaults", e);
                ClientConfig::default()
            }
        },
        Err(e) => {
            tracing::warn!("Failed to read config file: {}, using defaults", e);
            ClientConfig::default()
        }
    }
}
