//! Per-strategy configuration view

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StrategyError;

fn default_enabled() -> bool {
    true
}

/// One strategy entry of the runtime configuration
///
/// `instruments` and `accounts` are the two recognized keys; every other key
/// is kept in `extra` for the strategy to read with [`get`](Self::get).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub name: String,
    /// Path of the extension module
    #[serde(default)]
    pub libpath: Option<PathBuf>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Instrument names to watch
    #[serde(default)]
    pub instruments: Vec<String>,
    /// Account names to watch
    #[serde(default)]
    pub accounts: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StrategyConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            libpath: None,
            enabled: true,
            instruments: Vec::new(),
            accounts: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_instruments<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instruments = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_accounts<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accounts = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set an extra key
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instruments(&self) -> &[String] {
        &self.instruments
    }

    pub fn accounts(&self) -> &[String] {
        &self.accounts
    }

    /// Typed value of an extra key, `None` if absent
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StrategyError> {
        self.extra
            .get(key)
            .map(|value| {
                T::deserialize(value).map_err(|e| {
                    StrategyError::InvalidConfig(format!("{}.{}: {}", self.name, key, e))
                })
            })
            .transpose()
    }

    /// Typed value of an extra key, `default` if absent
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, StrategyError> {
        Ok(self.get(key)?.unwrap_or(default))
    }
}
