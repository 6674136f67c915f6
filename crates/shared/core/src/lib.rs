//! Hermes Core Domain
//!
//! Shared kernel of the Hermes event distribution runtime: the fixed-layout
//! event schema carried over channels, value types, domain enumerations and
//! the reference entities loaded into the context.
//! This crate contains no I/O and is 100% unit testable.

pub mod entities;
pub mod error;
pub mod events;
pub mod reference;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{Direction, Exchange, InstrumentType, OrderStatus, PriceType};
pub use error::ParseError;
pub use events::{
    Balance, Bar, CancelOrder, DEPTH_LEVELS, Depth, EVENT_SCHEMA_VERSION, EntityKey, Event,
    NewOrder, OrderUpdate, Static, Trade,
};
pub use reference::{Account, CalendarDate, Instrument, Reference, Underlying};
pub use values::{
    AccountId, Date, DateId, Id, InstrumentId, LargeVolume, Money, Price, Timestamp,
    UnderlyingId, Volume,
};
