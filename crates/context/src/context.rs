//! The context store
//!
//! [`Context`] aggregates the four reference tables and the four market/account
//! series. It is built once at startup and afterwards mutated only by the
//! dispatcher thread through the `on_*` methods.

use std::path::Path;

use hermes_core::{
    Account, Balance, Bar, CalendarDate, Date, Depth, Instrument, InstrumentId, Static, Underlying,
};

use crate::error::{ContextError, LoadError, SeriesError};
use crate::series::SeriesBuffer;
use crate::table::{ReferenceTable, TableRecord};

/// Daily statics kept per instrument
pub const STATIC_DEPTH: usize = 1;
/// Bars kept per instrument (one session of minute bars)
pub const BAR_DEPTH: usize = 240;
/// Depth snapshots kept per instrument
pub const DEPTH_HISTORY: usize = 2;
/// Balance snapshots kept per account
pub const BALANCE_DEPTH: usize = 2;

pub type StaticSeries = SeriesBuffer<Static, STATIC_DEPTH>;
pub type BarSeries = SeriesBuffer<Bar, BAR_DEPTH>;
pub type DepthSeries = SeriesBuffer<Depth, DEPTH_HISTORY>;
pub type BalanceSeries = SeriesBuffer<Balance, BALANCE_DEPTH>;

/// File names expected inside the data folder
pub const CALENDAR_FILE: &str = "calendar.csv";
pub const ACCOUNT_FILE: &str = "account.csv";
pub const UNDERLYING_FILE: &str = "underlying.csv";
pub const INSTRUMENT_FILE: &str = "instrument.csv";

/// Reference tables plus per-entity history
#[derive(Debug)]
pub struct Context {
    calendar: ReferenceTable<CalendarDate>,
    accounts: ReferenceTable<Account>,
    underlyings: ReferenceTable<Underlying>,
    instruments: ReferenceTable<Instrument>,
    statics: StaticSeries,
    bars: BarSeries,
    depths: DepthSeries,
    balances: BalanceSeries,
}

fn load_table<T: TableRecord>(folder: &Path, file: &str) -> Result<ReferenceTable<T>, ContextError> {
    ReferenceTable::load(folder.join(file)).map_err(|source| ContextError::Table {
        table: T::TABLE,
        source,
    })
}

impl Context {
    /// Load every reference table from `folder` and size the series
    ///
    /// Tables load in dependency order: calendar, account, underlying,
    /// instrument. Any failure aborts without returning a partial context.
    pub fn init(folder: impl AsRef<Path>) -> Result<Self, ContextError> {
        let folder = folder.as_ref();
        if !folder.is_dir() {
            return Err(ContextError::MissingFolder(folder.to_path_buf()));
        }

        let calendar = load_table(folder, CALENDAR_FILE)?;
        let accounts = load_table(folder, ACCOUNT_FILE)?;
        let underlyings = load_table(folder, UNDERLYING_FILE)?;
        let instruments = load_table(folder, INSTRUMENT_FILE)?;

        let context = Self::from_tables(calendar, accounts, underlyings, instruments)?;
        log::info!(
            "[context] Loaded {} dates, {} accounts, {} underlyings, {} instruments from {}",
            context.calendar.count(),
            context.accounts.count(),
            context.underlyings.count(),
            context.instruments.count(),
            folder.display()
        );
        Ok(context)
    }

    /// Assemble a context from loaded tables
    ///
    /// Resolves each instrument's underlying name and sizes every series to
    /// its table's count.
    pub fn from_tables(
        calendar: ReferenceTable<CalendarDate>,
        accounts: ReferenceTable<Account>,
        underlyings: ReferenceTable<Underlying>,
        instruments: ReferenceTable<Instrument>,
    ) -> Result<Self, ContextError> {
        let mut resolved = instruments.into_entries();
        for instrument in resolved.iter_mut() {
            let underlying_id = underlyings.get_id(&instrument.underlying).ok_or_else(|| {
                ContextError::UnresolvedUnderlying {
                    instrument: instrument.name.clone(),
                    underlying: instrument.underlying.clone(),
                }
            })?;
            instrument.underlying_id = Some(underlying_id);
        }
        let instruments =
            ReferenceTable::from_entries(resolved).map_err(|source: LoadError| {
                ContextError::Table {
                    table: <Instrument as TableRecord>::TABLE,
                    source,
                }
            })?;

        let mut statics = StaticSeries::new();
        let mut bars = BarSeries::new();
        let mut depths = DepthSeries::new();
        let mut balances = BalanceSeries::new();
        statics.resize(instruments.count());
        bars.resize(instruments.count());
        depths.resize(instruments.count());
        balances.resize(accounts.count());

        Ok(Self {
            calendar,
            accounts,
            underlyings,
            instruments,
            statics,
            bars,
            depths,
            balances,
        })
    }

    pub fn on_static(&mut self, fact: &Static) -> Result<(), SeriesError> {
        self.statics.push(*fact)
    }

    pub fn on_bar(&mut self, fact: &Bar) -> Result<(), SeriesError> {
        self.bars.push(*fact)
    }

    pub fn on_depth(&mut self, fact: &Depth) -> Result<(), SeriesError> {
        self.depths.push(*fact)
    }

    pub fn on_balance(&mut self, fact: &Balance) -> Result<(), SeriesError> {
        self.balances.push(*fact)
    }

    pub fn calendar(&self) -> &ReferenceTable<CalendarDate> {
        &self.calendar
    }

    pub fn accounts(&self) -> &ReferenceTable<Account> {
        &self.accounts
    }

    pub fn underlyings(&self) -> &ReferenceTable<Underlying> {
        &self.underlyings
    }

    pub fn instruments(&self) -> &ReferenceTable<Instrument> {
        &self.instruments
    }

    pub fn statics(&self) -> &StaticSeries {
        &self.statics
    }

    pub fn bars(&self) -> &BarSeries {
        &self.bars
    }

    pub fn depths(&self) -> &DepthSeries {
        &self.depths
    }

    pub fn balances(&self) -> &BalanceSeries {
        &self.balances
    }

    /// Underlying of an instrument
    pub fn underlying_of(&self, instrument_id: InstrumentId) -> Option<&Underlying> {
        let instrument = self.instruments.get(instrument_id).ok()?;
        self.underlyings.get(instrument.underlying_id?).ok()
    }

    /// Calendar row for `date`, if the calendar covers it
    pub fn calendar_date(&self, date: Date) -> Option<&CalendarDate> {
        self.calendar.get_by_name(&date.to_string()).ok()
    }

    /// True if `date` is a known trading day
    pub fn is_trading_day(&self, date: Date) -> bool {
        self.calendar_date(date).is_some_and(|d| d.is_trading_day)
    }

    /// The trading day following `date`, if the calendar covers it
    pub fn next_trading_day(&self, date: Date) -> Option<Date> {
        let id = self.calendar_date(date)?.next_trading_day_id?;
        self.calendar.get(id).ok().map(|d| d.date)
    }

    /// The trading day preceding `date`, if the calendar covers it
    pub fn prev_trading_day(&self, date: Date) -> Option<Date> {
        let id = self.calendar_date(date)?.prev_trading_day_id?;
        self.calendar.get(id).ok().map(|d| d.date)
    }
}
