//! Daemon configuration, loaded from `devloop.toml`.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dl_events::BroadcastPolicy;
use dl_proto::SessionSeed;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid bind address '{0}'")]
    InvalidBind(String),
}

/// Top-level daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP gateway listens on.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Allow cross-origin requests (browser dashboards).
    #[serde(default = "default_cors")]
    pub cors: bool,

    /// Initial state and trigger flags for the session.
    #[serde(default)]
    pub session: SessionSeed,

    #[serde(default)]
    pub events: EventsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors: default_cors(),
            session: SessionSeed::default(),
            events: EventsConfig::default(),
        }
    }
}

/// Event stream configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Undelivered entries a subscriber may accumulate before it is cut off.
    /// Omit for no bound.
    #[serde(default)]
    pub max_pending: Option<usize>,

    /// Seconds between SSE keep-alive comments.
    #[serde(default = "default_keep_alive_secs")]
    pub keep_alive_secs: u64,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            max_pending: None,
            keep_alive_secs: default_keep_alive_secs(),
        }
    }
}

impl EventsConfig {
    pub fn policy(&self) -> BroadcastPolicy {
        match self.max_pending {
            Some(max) => BroadcastPolicy::bounded(max),
            None => BroadcastPolicy::unbounded(),
        }
    }

    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs.max(1))
    }
}

// Serde default functions
fn default_bind() -> String {
    "127.0.0.1:50052".to_string()
}

fn default_cors() -> bool {
    true
}

fn default_keep_alive_secs() -> u64 {
    15
}

impl ServerConfig {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load config, returning defaults if the file doesn't exist.
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|_| ConfigError::InvalidBind(self.bind.clone()))
    }
}
