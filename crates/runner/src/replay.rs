//! Historical replay
//!
//! [`ReplayFeed`] merges several individually time-ordered event streams into
//! one stream ordered by timestamp. Ties go to the source added first.
//! Untimed events (statics, balances) take the time of the event before
//! them in their own source, so they stay where the source put them.

use std::cmp::Reverse;
use std::collections::VecDeque;
use std::fs::File;
use std::path::Path;

use hermes_channel::EventSource;
use hermes_context::Context;
use hermes_core::{Bar, Date, Event, Money, Price, Timestamp, Volume};
use priority_queue::PriorityQueue;
use serde::Deserialize;

use crate::error::ReplayError;

/// Timestamp-ordered merge of several event sources
#[derive(Debug, Default)]
pub struct ReplayFeed {
    sources: Vec<VecDeque<Event>>,
    clocks: Vec<Timestamp>,
    heads: PriorityQueue<usize, Reverse<(Timestamp, usize)>>,
}

impl ReplayFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a time-ordered source; returns its index
    pub fn add_source(&mut self, events: impl IntoIterator<Item = Event>) -> usize {
        let index = self.sources.len();
        self.sources.push(events.into_iter().collect());
        self.clocks.push(Timestamp::default());
        self.schedule(index);
        index
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Events not yet replayed
    pub fn len(&self) -> usize {
        self.sources.iter().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.heads.is_empty()
    }

    fn schedule(&mut self, index: usize) {
        if let Some(head) = self.sources[index].front() {
            let at = head.timestamp().unwrap_or(self.clocks[index]);
            self.heads.push(index, Reverse((at, index)));
        }
    }
}

impl EventSource for ReplayFeed {
    fn try_read(&mut self) -> Option<Event> {
        let (index, Reverse((at, _))) = self.heads.pop()?;
        let event = self.sources[index].pop_front()?;
        self.clocks[index] = at;
        self.schedule(index);
        Some(event)
    }
}

impl Iterator for ReplayFeed {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        self.try_read()
    }
}

#[derive(Debug, Deserialize)]
struct BarRow {
    trading_day: String,
    update_time: String,
    instrument: String,
    open: Price,
    high: Price,
    low: Price,
    close: Price,
    volume: Volume,
    turnover: Money,
}

/// Read a bar file, resolving instrument names against `context`
///
/// Columns: `trading_day,update_time,instrument,open,high,low,close,volume,turnover`,
/// with `trading_day` as `YYYYMMDD` and `update_time` as `YYYY-MM-DD HH:MM:SS[.fff]`.
pub fn load_bar_file(path: impl AsRef<Path>, context: &Context) -> Result<Vec<Event>, ReplayError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let bars = read_bars(file, context)?;
    log::info!("[replay] Loaded {} bars from {}", bars.len(), path.display());
    Ok(bars)
}

/// Read bars from any CSV reader
pub fn read_bars<R: std::io::Read>(reader: R, context: &Context) -> Result<Vec<Event>, ReplayError> {
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut events = Vec::new();
    for (row, record) in csv.deserialize::<BarRow>().enumerate() {
        let record = record?;
        let instrument_id = context
            .instruments()
            .get_id(&record.instrument)
            .ok_or_else(|| ReplayError::UnknownInstrument {
                row,
                name: record.instrument.clone(),
            })?;
        let trading_day: Date =
            record
                .trading_day
                .parse()
                .map_err(|_| ReplayError::InvalidField {
                    row,
                    field: "trading_day",
                    value: record.trading_day.clone(),
                })?;
        let update_time =
            Timestamp::parse(&record.update_time).map_err(|_| ReplayError::InvalidField {
                row,
                field: "update_time",
                value: record.update_time.clone(),
            })?;

        events.push(Event::Bar(Bar {
            trading_day,
            update_time,
            instrument_id,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            volume: record.volume,
            turnover: record.turnover,
        }));
    }
    Ok(events)
}
