//////////////////////////
// config.rs
//////////////////////////

use log::debug;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

pub const CONFIG_PATH_VAR: &str = "PEER_CHESS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "peer_chess.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the hosting peer listens.
    pub bind_addr: SocketAddr,
    /// Host name written into invite links.
    pub invite_host: String,
    /// How long a joining peer waits for the channel to open.
    pub connect_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            invite_host: "127.0.0.1".to_string(),
            connect_timeout_ms: 5000,
        }
    }
}

impl Config {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Defaults, then the JSON file named by `PEER_CHESS_CONFIG` (or
    /// `peer_chess.json` if it exists), then individual env overrides.
    pub fn load() -> Result<Config, ConfigError> {
        let config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Config::from_file(Path::new(&path))?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Config::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            Err(_) => Config::default(),
        };
        let config = config.with_overrides(|name| std::env::var(name).ok())?;
        debug!("Loaded config: {:?}", config);
        Ok(config)
    }

    /// Applies `PEER_CHESS_BIND`, `PEER_CHESS_INVITE_HOST` and
    /// `PEER_CHESS_CONNECT_TIMEOUT_MS` as returned by `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        if let Some(value) = lookup("PEER_CHESS_BIND") {
            self.bind_addr = value.parse().map_err(|_| ConfigError::InvalidEnv {
                name: "PEER_CHESS_BIND",
                value,
            })?;
        }
        if let Some(value) = lookup("PEER_CHESS_INVITE_HOST") {
            self.invite_host = value;
        }
        if let Some(value) = lookup("PEER_CHESS_CONNECT_TIMEOUT_MS") {
            self.connect_timeout_ms = value.parse().map_err(|_| ConfigError::InvalidEnv {
                name: "PEER_CHESS_CONNECT_TIMEOUT_MS",
                value,
            })?;
        }
        Ok(self)
    }
}
