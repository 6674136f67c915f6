mod date;
mod timestamp;

pub use date::Date;
pub use timestamp::Timestamp;

/// Dense 0-based identifier shared by every reference table and series.
///
/// IDs are assigned in file order when a reference table is loaded, so they
/// double as vector indices everywhere in the runtime.
pub type Id = u32;

/// Identifier of a row in the instrument table
pub type InstrumentId = Id;

/// Identifier of a row in the underlying table
pub type UnderlyingId = Id;

/// Identifier of a row in the account table
pub type AccountId = Id;

/// Identifier of a row in the calendar table
pub type DateId = Id;

/// Price value
///
/// Fixed-layout events carry plain `f64` so that the wire format stays
/// trivially copyable across processes.
pub type Price = f64;

/// Monetary amount (balances, margins, turnover)
pub type Money = f64;

/// Contract volume
pub type Volume = i32;

/// Volume that can exceed `i32` (open interest)
pub type LargeVolume = i64;
