//! Reference entities
//!
//! Immutable records loaded once at startup. Each carries a dense 0-based
//! `id` equal to its row index and a unique `name`.

mod account;
mod calendar;
mod instrument;
mod underlying;

pub use account::Account;
pub use calendar::CalendarDate;
pub use instrument::Instrument;
pub use underlying::Underlying;

use crate::values::Id;

/// Common view over every reference entity
pub trait Reference {
    fn id(&self) -> Id;
    fn name(&self) -> &str;
}
