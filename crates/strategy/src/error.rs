//! Error types for the strategy crate

use std::path::PathBuf;

use hermes_core::Id;
use thiserror::Error;

/// Errors raised by a strategy while configuring itself
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StrategyError {
    #[error("Unknown instrument: {0}")]
    UnknownInstrument(String),

    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    #[error("{space} id {id} out of range (interest set holds {len})")]
    InterestOutOfRange {
        space: &'static str,
        id: Id,
        len: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised while loading or initializing an extension module
#[derive(Error, Debug)]
pub enum ExtensionError {
    #[error("Failed to load module {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("Module {module} does not export {symbol}")]
    MissingSymbol {
        module: String,
        symbol: &'static str,
    },

    #[error("Module {0} failed to construct a strategy")]
    ConstructionFailed(String),

    #[error("Strategy {name} failed to initialize: {source}")]
    Init {
        name: String,
        #[source]
        source: StrategyError,
    },

    #[error("Strategy {name} panicked in {callback}")]
    Panicked {
        name: String,
        callback: &'static str,
    },
}
