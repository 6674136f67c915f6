//! Hermes Strategy Framework
//!
//! Provides the infrastructure for building and hosting strategy extensions:
//! - Strategy trait with per-fact callbacks
//! - Interest sets filtering which entities a strategy observes
//! - Stable C-linkage factory pair for dynamically loaded modules, plus a
//!   hook that routes module log output to the host's logger
//! - Extension host that owns a loaded instance and isolates its failures
//!
//! ## Architecture
//!
//! ```text
//!   libmy_strategy.so
//!   ┌────────────────────────────┐
//!   │ hermes_strategy_set_logger │
//!   │ hermes_strategy_create     │──┐
//!   │ hermes_strategy_destroy    │  │ ModuleSource
//!   └────────────────────────────┘  ▼
//!                            ┌───────────────┐  Setup   ┌──────────┐
//!                            │ ExtensionHost │─────────►│ Strategy │
//!                            │  interests    │  on_*    │          │
//!                            └───────────────┘─────────►└──────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hermes_strategy::{Setup, Strategy, StrategyError, export_strategy};
//!
//! #[derive(Default)]
//! struct Watcher;
//!
//! impl Strategy for Watcher {
//!     fn name(&self) -> &str { "watcher" }
//!     fn init(&mut self, setup: &mut Setup<'_>) -> Result<(), StrategyError> {
//!         setup.watch_configured()
//!     }
//! }
//!
//! export_strategy!(Watcher, Watcher::default);
//! ```

pub mod abi;
pub mod config;
pub mod error;
pub mod host;
pub mod interest;
pub mod module;
pub mod strategy;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use abi::{CreateFn, DestroyFn, HostLogger, SetLoggerFn, StrategyHandle};
pub use config::StrategyConfig;
pub use error::{ExtensionError, StrategyError};
pub use host::ExtensionHost;
pub use interest::InterestSet;
pub use module::{DynamicModule, ModuleSource, StaticModule};
pub use strategy::{Setup, Strategy};
