//! Domain enumerations shared by events and reference tables
//!
//! Every enum is `#[repr(i32)]` so it can be embedded in fixed-layout events,
//! and parses from the lowercase label used in reference files.

mod direction;
mod exchange;
mod instrument_type;
mod order_status;
mod price_type;

pub use direction::Direction;
pub use exchange::Exchange;
pub use instrument_type::InstrumentType;
pub use order_status::OrderStatus;
pub use price_type::PriceType;
