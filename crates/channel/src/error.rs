//! Error types for the channel crate

use std::path::PathBuf;

use thiserror::Error;

/// Failure creating, opening or validating a shared segment
#[derive(Error, Debug)]
pub enum SegmentError {
    #[error("I/O error on segment {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid channel name: {0:?}")]
    InvalidName(String),

    #[error("Segment not found: {0}")]
    NotFound(PathBuf),

    #[error("Segment {0} is not initialized yet")]
    Uninitialized(String),

    #[error("Segment {name} has capacity {found}, expected {expected}")]
    CapacityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Segment {name} layout mismatch on {field}: expected {expected}, found {found}")]
    LayoutMismatch {
        name: String,
        field: &'static str,
        expected: u64,
        found: u64,
    },

    #[error("Channel capacity must be positive")]
    ZeroCapacity,

    #[error("Channel capacity {0} exceeds the addressable segment size")]
    CapacityTooLarge(usize),
}

/// Channel-level errors
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("Segment error: {0}")]
    Segment(#[from] SegmentError),

    #[error("Channel {0} is full")]
    Full(String),
}
