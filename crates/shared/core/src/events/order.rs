//! Order flow payloads

use crate::entities::{Direction, OrderStatus, PriceType};
use crate::values::{Id, InstrumentId, Price, Timestamp, Volume};

/// Order submission request
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NewOrder {
    pub create_time: Timestamp,
    pub instrument_id: InstrumentId,
    /// Client-assigned order reference
    pub client_id: Id,
    /// Extension that originated the order
    pub strategy_id: Id,
    pub price_type: PriceType,
    pub direction: Direction,
    pub price: Price,
    pub volume: Volume,
}

/// Cancellation request for a previously submitted order
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CancelOrder {
    pub create_time: Timestamp,
    pub instrument_id: InstrumentId,
    pub client_id: Id,
    pub strategy_id: Id,
}

/// Venue report on an order's state
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrderUpdate {
    pub update_time: Timestamp,
    pub instrument_id: InstrumentId,
    /// Venue-assigned order id
    pub order_id: Id,
    pub client_id: Id,
    pub status: OrderStatus,
    pub price: Price,
    pub volume: Volume,
    pub filled_volume: Volume,
    pub pulled_volume: Volume,
}

/// Execution report
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Trade {
    pub instrument_id: InstrumentId,
    pub update_time: Timestamp,
    pub price: Price,
    pub volume: Volume,
    pub direction: Direction,
}

impl OrderUpdate {
    /// Volume still working on the book
    pub fn remaining_volume(&self) -> Volume {
        (self.volume - self.filled_volume - self.pulled_volume).max(0)
    }
}

impl Trade {
    /// Signed traded volume, negative for sells
    pub fn signed_volume(&self) -> Volume {
        self.volume * self.direction.sign()
    }

    pub fn notional(&self) -> Price {
        self.price * f64::from(self.volume)
    }
}
