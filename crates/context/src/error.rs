//! Error types for the context crate

use std::path::PathBuf;

use hermes_core::Id;
use thiserror::Error;

/// Failure while loading a reference table
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("ID is not continuous: row {expected} declares id {found}")]
    NonContiguousId { expected: usize, found: Id },

    #[error("Duplicate name: {0}")]
    DuplicateName(String),

    #[error("Invalid {field} at row {row}: {value:?}")]
    InvalidField {
        row: usize,
        field: &'static str,
        value: String,
    },
}

/// Failure while querying a reference table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Unknown name: {0}")]
    NotFound(String),

    #[error("ID {id} out of range (table has {count} entries)")]
    IdOutOfRange { id: Id, count: usize },
}

/// Failure while pushing to or reading from a series buffer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    #[error("Entity {id} out of range (series sized for {count})")]
    OutOfRange { id: Id, count: usize },

    #[error("No value recorded for entity {0}")]
    Empty(Id),

    #[error("Entity {id} has {available} values, {needed} needed")]
    InsufficientHistory {
        id: Id,
        needed: usize,
        available: usize,
    },
}

/// Fatal failure while initializing the context
#[derive(Error, Debug)]
pub enum ContextError {
    #[error("Data folder does not exist: {0}")]
    MissingFolder(PathBuf),

    #[error("Failed to load {table} table: {source}")]
    Table {
        table: &'static str,
        #[source]
        source: LoadError,
    },

    #[error("Instrument {instrument} references unknown underlying {underlying}")]
    UnresolvedUnderlying {
        instrument: String,
        underlying: String,
    },
}
