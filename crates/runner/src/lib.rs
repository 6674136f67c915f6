//! Hermes runtime
//!
//! Wires the pieces together for one trading process:
//!
//! - [`RuntimeConfig`]: JSON configuration shared by the runner and the
//!   replay writer
//! - [`bootstrap`]: loads the context, opens the channel reader and attaches
//!   the configured extensions
//! - [`Dispatcher`]: the single-threaded event loop
//! - [`ReplayFeed`]: timestamp-ordered merge of historical files, used on
//!   the writer side for offline runs

pub mod bootstrap;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod replay;

pub use bootstrap::{bootstrap, load_extensions};
pub use config::{IdleConfig, ReplayConfig, RuntimeConfig};
pub use dispatcher::{DispatchStats, Dispatcher};
pub use error::{ConfigError, ReplayError, RunnerError};
pub use replay::{ReplayFeed, load_bar_file, read_bars};
