//! Hermes Channel
//!
//! Fixed-capacity, single-producer/single-consumer event channel between two
//! processes on the same host.
//!
//! ## Architecture
//!
//! ```text
//!  Producer process                      Consumer process
//!  ┌──────────────┐   /dev/shm/<name>   ┌──────────────┐
//!  │ChannelWriter │──► [hdr|slots...] ──►│ChannelReader │
//!  └──────────────┘                      └──────────────┘
//! ```
//!
//! The two ring indices in the segment header are the only synchronization
//! point: no locks and no syscalls on the data path. A full ring makes
//! `try_write` return `false`; events are never overwritten silently.
//!
//! ## Endpoints
//!
//! [`EventSource`] and [`EventSink`] abstract the two ends so the dispatcher
//! and the publisher also work over in-process queues.

mod channel;
pub mod config;
pub mod error;
pub mod publisher;
mod segment;
pub mod source;

pub use channel::{ChannelReader, ChannelWriter};
pub use config::{ChannelConfig, DEFAULT_CAPACITY, DEFAULT_DIRECTORY};
pub use error::{ChannelError, SegmentError};
pub use publisher::{EventPublisher, PublishPolicy, PublishStats};
pub use source::{EventSink, EventSource};
