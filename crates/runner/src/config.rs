//! Runtime configuration
//!
//! A single JSON document shared by the runner and the replay writer:
//!
//! ```json
//! {
//!   "data_folder": "./data",
//!   "channel": { "name": "hermes_md", "capacity": 4096 },
//!   "open_timeout_ms": 5000,
//!   "idle": { "spin_limit": 64, "park_micros": 100 },
//!   "strategies": [
//!     { "name": "demo", "libpath": "./libhermes_demo_strategy.so",
//!       "instruments": ["rb2405"], "accounts": ["acc001"], "window": 20 }
//!   ],
//!   "replay": { "bar_files": ["./data/bars.csv"] }
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use hermes_channel::{ChannelConfig, PublishPolicy};
use hermes_strategy::StrategyConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_open_timeout_ms() -> u64 {
    5_000
}

fn default_spin_limit() -> u32 {
    64
}

fn default_park_micros() -> u64 {
    100
}

fn default_replay_policy() -> PublishPolicy {
    PublishPolicy::Retry { attempts: 10_000 }
}

fn default_linger_ms() -> u64 {
    30_000
}

/// Dispatcher idle behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdleConfig {
    /// Empty polls spent spinning/yielding before parking
    #[serde(default = "default_spin_limit")]
    pub spin_limit: u32,
    /// Park duration once the spin budget is spent
    #[serde(default = "default_park_micros")]
    pub park_micros: u64,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            spin_limit: default_spin_limit(),
            park_micros: default_park_micros(),
        }
    }
}

impl IdleConfig {
    pub fn park_duration(&self) -> Duration {
        Duration::from_micros(self.park_micros)
    }
}

/// Offline replay settings used by `hermes-replay`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Bar files merged by timestamp
    #[serde(default)]
    pub bar_files: Vec<PathBuf>,
    /// Full-channel policy
    #[serde(default = "default_replay_policy")]
    pub policy: PublishPolicy,
    /// How long to keep the segment alive for the reader to drain
    #[serde(default = "default_linger_ms")]
    pub linger_ms: u64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            bar_files: Vec::new(),
            policy: default_replay_policy(),
            linger_ms: default_linger_ms(),
        }
    }
}

/// Root configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Folder holding the reference tables
    pub data_folder: PathBuf,

    /// Channel shared with the producer
    pub channel: ChannelConfig,

    /// How long the reader waits for the writer to publish the channel
    #[serde(default = "default_open_timeout_ms")]
    pub open_timeout_ms: u64,

    #[serde(default)]
    pub idle: IdleConfig,

    /// Extensions, in registration order
    #[serde(default)]
    pub strategies: Vec<StrategyConfig>,

    #[serde(default)]
    pub replay: ReplayConfig,
}

impl RuntimeConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// Parse configuration from a JSON string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn open_timeout(&self) -> Duration {
        Duration::from_millis(self.open_timeout_ms)
    }

    /// Enabled strategies, in registration order
    pub fn enabled_strategies(&self) -> impl Iterator<Item = &StrategyConfig> {
        self.strategies.iter().filter(|s| s.enabled)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_folder.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_folder is empty".to_string()));
        }
        self.channel
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        let mut names = HashSet::new();
        for strategy in &self.strategies {
            if !names.insert(strategy.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate strategy name: {}",
                    strategy.name
                )));
            }
            if strategy.enabled && strategy.libpath.is_none() {
                return Err(ConfigError::Invalid(format!(
                    "strategy {} has no libpath",
                    strategy.name
                )));
            }
        }
        Ok(())
    }
}
