//! Configuration for the BitEx console.
//!
//! Values come from, in increasing priority:
//! - built-in defaults,
//! - an optional TOML file,
//! - environment variables:
//!   - `BITEX_URL`            (default: "ws://127.0.0.1:8443/trade/")
//!   - `BITEX_USERNAME`
//!   - `BITEX_PASSWORD`
//!   - `BITEX_HEARTBEAT_SECS` (default: "30")
//!
//! Command-line flags are applied on top by the binary.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid value for {key}: {value:?}")]
    InvalidEnv { key: String, value: String },
}

/// Console configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// WebSocket endpoint of the venue.
    pub url: String,

    /// Login credentials; without them the console only watches market data.
    pub username: Option<String>,
    pub password: Option<String>,

    /// Market depth requested on subscribe (`1` = top of book).
    pub market_depth: u32,

    /// Instruments to subscribe to.
    pub symbols: Vec<String>,

    /// Entry type codes to subscribe to.
    pub entry_types: Vec<String>,

    /// Seconds between test requests.
    pub heartbeat_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:8443/trade/".to_string(),
            username: None,
            password: None,
            market_depth: 0,
            symbols: vec!["BTCUSD".to_string()],
            entry_types: vec!["0".to_string(), "1".to_string(), "2".to_string()],
            heartbeat_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Defaults, then `path` if given, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        base.with_overrides(|key| env::var(key).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse TOML; missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Apply `BITEX_*` overrides looked up through `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("BITEX_URL") {
            self.url = url;
        }
        if let Some(username) = lookup("BITEX_USERNAME") {
            self.username = Some(username);
        }
        if let Some(password) = lookup("BITEX_PASSWORD") {
            self.password = Some(password);
        }
        if let Some(secs) = parse_override(&lookup, "BITEX_HEARTBEAT_SECS")? {
            self.heartbeat_secs = secs;
        }
        Ok(self)
    }

    /// Username and password, when both are set.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(u), Some(p)) => Some((u.as_str(), p.as_str())),
            _ => None,
        }
    }
}

fn parse_override<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv {
                key: key.to_string(),
                value,
            }),
        None => Ok(None),
    }
}
