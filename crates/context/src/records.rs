//! File formats of the four reference tables
//!
//! Rows are read as raw strings and converted field by field so that a bad
//! value is reported with its row and column.

use std::str::FromStr;

use hermes_core::{Account, CalendarDate, Date, Exchange, Id, Instrument, InstrumentType, Underlying};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::LoadError;
use crate::table::TableRecord;

fn parse_field<T: FromStr>(row: usize, field: &'static str, value: &str) -> Result<T, LoadError> {
    value.trim().parse().map_err(|_| LoadError::InvalidField {
        row,
        field,
        value: value.to_string(),
    })
}

fn parse_bool(row: usize, field: &'static str, value: &str) -> Result<bool, LoadError> {
    match value.trim() {
        "1" | "true" | "True" | "TRUE" => Ok(true),
        "0" | "false" | "False" | "FALSE" => Ok(false),
        _ => Err(LoadError::InvalidField {
            row,
            field,
            value: value.to_string(),
        }),
    }
}

/// Dates in reference files; `0` or empty means "none"
fn parse_optional_date(row: usize, field: &'static str, value: &str) -> Result<Date, LoadError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "0" {
        return Ok(Date::default());
    }
    parse_field(row, field, trimmed)
}

#[derive(Debug, Deserialize)]
pub struct AccountRow {
    id: String,
    name: String,
    alias: String,
}

impl TableRecord for Account {
    type Row = AccountRow;
    const TABLE: &'static str = "account";

    fn from_row(row: AccountRow, index: usize) -> Result<Self, LoadError> {
        Ok(Account {
            id: parse_field(index, "id", &row.id)?,
            name: row.name,
            alias: row.alias,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UnderlyingRow {
    id: String,
    name: String,
    exchange: String,
    multiplier: String,
    lot_size: String,
    tick_size: String,
}

impl TableRecord for Underlying {
    type Row = UnderlyingRow;
    const TABLE: &'static str = "underlying";

    fn from_row(row: UnderlyingRow, index: usize) -> Result<Self, LoadError> {
        Ok(Underlying {
            id: parse_field(index, "id", &row.id)?,
            name: row.name,
            exchange: parse_field::<Exchange>(index, "exchange", &row.exchange)?,
            multiplier: parse_field(index, "multiplier", &row.multiplier)?,
            lot_size: parse_field(index, "lot_size", &row.lot_size)?,
            tick_size: parse_field::<Decimal>(index, "tick_size", &row.tick_size)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct InstrumentRow {
    id: String,
    name: String,
    underlying: String,
    #[serde(rename = "type")]
    kind: String,
    create_date: String,
    expire_date: String,
    long_margin_ratio: String,
    short_margin_ratio: String,
}

impl TableRecord for Instrument {
    type Row = InstrumentRow;
    const TABLE: &'static str = "instrument";

    fn from_row(row: InstrumentRow, index: usize) -> Result<Self, LoadError> {
        Ok(Instrument {
            id: parse_field(index, "id", &row.id)?,
            name: row.name,
            underlying: row.underlying,
            underlying_id: None,
            kind: parse_field::<InstrumentType>(index, "type", &row.kind)?,
            create_date: parse_optional_date(index, "create_date", &row.create_date)?,
            expire_date: parse_optional_date(index, "expire_date", &row.expire_date)?,
            long_margin_ratio: parse_field(index, "long_margin_ratio", &row.long_margin_ratio)?,
            short_margin_ratio: parse_field(index, "short_margin_ratio", &row.short_margin_ratio)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CalendarRow {
    id: String,
    date: String,
    is_trading_day: String,
    prev_trading_day: String,
    next_trading_day: String,
}

impl TableRecord for CalendarDate {
    type Row = CalendarRow;
    const TABLE: &'static str = "calendar";

    fn from_row(row: CalendarRow, index: usize) -> Result<Self, LoadError> {
        let id: Id = parse_field(index, "id", &row.id)?;
        let date: Date = parse_field(index, "date", &row.date)?;
        Ok(CalendarDate::new(
            id,
            date,
            parse_bool(index, "is_trading_day", &row.is_trading_day)?,
            parse_optional_date(index, "prev_trading_day", &row.prev_trading_day)?,
            parse_optional_date(index, "next_trading_day", &row.next_trading_day)?,
        ))
    }

    fn link(records: &mut [Self]) {
        let ids: std::collections::HashMap<Date, Id> =
            records.iter().map(|r| (r.date, r.id)).collect();
        for record in records.iter_mut() {
            record.prev_trading_day_id = ids.get(&record.prev_trading_date).copied();
            record.next_trading_day_id = ids.get(&record.next_trading_date).copied();
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::table::ReferenceTable;

    #[test]
    fn test_underlying_rows() {
        let data = "id,name,exchange,multiplier,lot_size,tick_size\n\
                    0,rb,SHFE,10,1,1\n\
                    1,IF,FFEX,300,1,0.2\n";
        let table = ReferenceTable::<Underlying>::load_from_reader(data.as_bytes()).unwrap();

        let index = table.get_by_name("IF").unwrap();
        assert_eq!(index.exchange, Exchange::Ffex);
        assert_eq!(index.multiplier, 300);
        assert_eq!(index.tick_size, dec!(0.2));
    }

    #[test]
    fn test_instrument_rows() {
        let data = "id,name,underlying,type,create_date,expire_date,long_margin_ratio,short_margin_ratio\n\
                    0,rb2405,rb,futures,20230516,20240515,0.07,0.08\n";
        let table = ReferenceTable::<Instrument>::load_from_reader(data.as_bytes()).unwrap();

        let rb = table.get(0).unwrap();
        assert_eq!(rb.kind, InstrumentType::Futures);
        assert_eq!(rb.expire_date, Date::new(20240515));
        assert_eq!(rb.short_margin_ratio, dec!(0.08));
        assert_eq!(rb.underlying_id, None);
    }

    #[test]
    fn test_invalid_field_is_reported() {
        let data = "id,name,exchange,multiplier,lot_size,tick_size\n0,rb,MOON,10,1,1\n";
        let err = ReferenceTable::<Underlying>::load_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidField {
                row: 0,
                field: "exchange",
                ..
            }
        ));
    }

    #[test]
    fn test_calendar_links_neighbours() {
        let data = "id,date,is_trading_day,prev_trading_day,next_trading_day\n\
                    0,20240105,1,20240104,20240108\n\
                    1,20240106,0,20240105,20240108\n\
                    2,20240107,0,20240105,20240108\n\
                    3,20240108,1,20240105,20240109\n";
        let table = ReferenceTable::<CalendarDate>::load_from_reader(data.as_bytes()).unwrap();

        let saturday = table.get_by_name("20240106").unwrap();
        assert!(!saturday.is_trading_day);
        assert_eq!(saturday.prev_trading_day_id, Some(0));
        assert_eq!(saturday.next_trading_day_id, Some(3));

        // Neighbours outside the loaded window stay unresolved
        let first = table.get(0).unwrap();
        assert_eq!(first.prev_trading_day_id, None);
        assert_eq!(table.get(3).unwrap().next_trading_day_id, None);
    }
}
