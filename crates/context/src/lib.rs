//! Hermes Context Store
//!
//! Immutable reference tables (calendar, accounts, underlyings, instruments)
//! and fixed-depth per-entity series (statics, bars, depths, balances) that
//! both the dispatcher and strategy extensions query.
//!
//! The context is passed explicitly as `&Context`; there is no global instance.

mod context;
pub mod error;
mod records;
pub mod series;
pub mod table;

pub use context::{
    ACCOUNT_FILE, BALANCE_DEPTH, BAR_DEPTH, BalanceSeries, BarSeries, CALENDAR_FILE, Context,
    DEPTH_HISTORY, DepthSeries, INSTRUMENT_FILE, STATIC_DEPTH, StaticSeries, UNDERLYING_FILE,
};
pub use error::{ContextError, LoadError, LookupError, SeriesError};
pub use records::{AccountRow, CalendarRow, InstrumentRow, UnderlyingRow};
pub use series::{SeriesBuffer, SeriesItem};
pub use table::{ReferenceTable, TableRecord};
