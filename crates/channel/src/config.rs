//! Channel configuration
//!
//! Writer and reader must agree on name and capacity out of band; both read
//! them from the same [`ChannelConfig`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SegmentError;
use crate::segment::segment_len;

/// Default location of named segments (Linux POSIX shared-memory mount)
pub const DEFAULT_DIRECTORY: &str = "/dev/shm";

/// Default number of event slots
pub const DEFAULT_CAPACITY: usize = 4096;

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_directory() -> PathBuf {
    PathBuf::from(DEFAULT_DIRECTORY)
}

/// Identifies one shared-memory channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Segment name, a single path component
    pub name: String,
    /// Number of event slots
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Directory holding the backing file
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
}

impl ChannelConfig {
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            capacity,
            directory: default_directory(),
        }
    }

    /// Builder-style override of the segment directory
    pub fn with_directory(mut self, directory: impl AsRef<Path>) -> Self {
        self.directory = directory.as_ref().to_path_buf();
        self
    }

    /// Full path of the backing file
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.name)
    }

    pub fn validate(&self) -> Result<(), SegmentError> {
        if self.name.is_empty() || self.name.contains('/') || self.name == "." || self.name == ".." {
            return Err(SegmentError::InvalidName(self.name.clone()));
        }
        if self.capacity == 0 {
            return Err(SegmentError::ZeroCapacity);
        }
        if segment_len(self.capacity).is_none() {
            return Err(SegmentError::CapacityTooLarge(self.capacity));
        }
        Ok(())
    }
}
