//! Fixed-layout event schema
//!
//! Every payload is `#[repr(C)]`, `Copy` and pointer-free. An [`Event`] can be
//! copied byte-for-byte into a shared-memory slot and read back by another
//! process built against the same [`EVENT_SCHEMA_VERSION`].

mod account;
mod market;
mod order;

pub use account::Balance;
pub use market::{Bar, DEPTH_LEVELS, Depth, Static};
pub use order::{CancelOrder, NewOrder, OrderUpdate, Trade};

use crate::values::{AccountId, InstrumentId, Timestamp};

/// Bumped whenever a payload layout changes
pub const EVENT_SCHEMA_VERSION: u32 = 1;

/// Tagged union of every event kind carried by a channel
#[repr(C, u32)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Static(Static),
    Bar(Bar),
    Depth(Depth),
    Balance(Balance),
    NewOrder(NewOrder),
    CancelOrder(CancelOrder),
    OrderUpdate(OrderUpdate),
    Trade(Trade),
}

/// Entity an event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Instrument(InstrumentId),
    Account(AccountId),
}

impl Event {
    /// Short kind label for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Static(_) => "static",
            Event::Bar(_) => "bar",
            Event::Depth(_) => "depth",
            Event::Balance(_) => "balance",
            Event::NewOrder(_) => "new_order",
            Event::CancelOrder(_) => "cancel_order",
            Event::OrderUpdate(_) => "order_update",
            Event::Trade(_) => "trade",
        }
    }

    /// The instrument or account this event is about
    pub fn key(&self) -> EntityKey {
        match self {
            Event::Static(e) => EntityKey::Instrument(e.instrument_id),
            Event::Bar(e) => EntityKey::Instrument(e.instrument_id),
            Event::Depth(e) => EntityKey::Instrument(e.instrument_id),
            Event::Balance(e) => EntityKey::Account(e.account_id),
            Event::NewOrder(e) => EntityKey::Instrument(e.instrument_id),
            Event::CancelOrder(e) => EntityKey::Instrument(e.instrument_id),
            Event::OrderUpdate(e) => EntityKey::Instrument(e.instrument_id),
            Event::Trade(e) => EntityKey::Instrument(e.instrument_id),
        }
    }

    /// Event time, if the payload carries one
    ///
    /// Static and balance snapshots are untimed.
    pub fn timestamp(&self) -> Option<Timestamp> {
        match self {
            Event::Bar(e) => Some(e.update_time),
            Event::Depth(e) => Some(e.update_time),
            Event::NewOrder(e) => Some(e.create_time),
            Event::CancelOrder(e) => Some(e.create_time),
            Event::OrderUpdate(e) => Some(e.update_time),
            Event::Trade(e) => Some(e.update_time),
            Event::Static(_) | Event::Balance(_) => None,
        }
    }
}

impl Default for Event {
    fn default() -> Self {
        Event::Static(Static::default())
    }
}

impl From<Static> for Event {
    fn from(e: Static) -> Self {
        Event::Static(e)
    }
}

impl From<Bar> for Event {
    fn from(e: Bar) -> Self {
        Event::Bar(e)
    }
}

impl From<Depth> for Event {
    fn from(e: Depth) -> Self {
        Event::Depth(e)
    }
}

impl From<Balance> for Event {
    fn from(e: Balance) -> Self {
        Event::Balance(e)
    }
}

impl From<NewOrder> for Event {
    fn from(e: NewOrder) -> Self {
        Event::NewOrder(e)
    }
}

impl From<CancelOrder> for Event {
    fn from(e: CancelOrder) -> Self {
        Event::CancelOrder(e)
    }
}

impl From<OrderUpdate> for Event {
    fn from(e: OrderUpdate) -> Self {
        Event::OrderUpdate(e)
    }
}

impl From<Trade> for Event {
    fn from(e: Trade) -> Self {
        Event::Trade(e)
    }
}
