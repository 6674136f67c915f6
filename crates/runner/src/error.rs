//! Error types for the runner crate

use std::path::PathBuf;

use hermes_channel::SegmentError;
use hermes_context::ContextError;
use thiserror::Error;

/// Failure reading or validating the runtime configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Failure reading a historical replay file
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed replay file: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unknown instrument {name} at row {row}")]
    UnknownInstrument { row: usize, name: String },

    #[error("Invalid {field} at row {row}: {value:?}")]
    InvalidField {
        row: usize,
        field: &'static str,
        value: String,
    },
}

/// Fatal startup failure
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Context error: {0}")]
    Context(#[from] ContextError),

    #[error("Channel error: {0}")]
    Channel(#[from] SegmentError),

    #[error("Replay error: {0}")]
    Replay(#[from] ReplayError),
}
