//! Context fixtures for unit tests

use hermes_context::{Context, ReferenceTable};
use hermes_core::{Account, CalendarDate, Date, Exchange, Instrument, InstrumentType, Underlying};
use rust_decimal::Decimal;

/// Context with instruments `i0..` and accounts `a0..`
pub(crate) fn context(instruments: usize, accounts: usize) -> Context {
    let calendar = ReferenceTable::from_entries(vec![CalendarDate::new(
        0,
        Date::new(20240102),
        true,
        Date::default(),
        Date::default(),
    )])
    .unwrap();
    let underlyings = ReferenceTable::from_entries(vec![Underlying {
        id: 0,
        name: "u0".to_string(),
        exchange: Exchange::Shfe,
        multiplier: 10,
        lot_size: 1,
        tick_size: Decimal::ONE,
    }])
    .unwrap();
    let instruments = ReferenceTable::from_entries(
        (0..instruments)
            .map(|i| Instrument {
                id: i as u32,
                name: format!("i{i}"),
                underlying: "u0".to_string(),
                underlying_id: None,
                kind: InstrumentType::Futures,
                create_date: Date::new(20230101),
                expire_date: Date::new(20251231),
                long_margin_ratio: Decimal::ONE,
                short_margin_ratio: Decimal::ONE,
            })
            .collect(),
    )
    .unwrap();
    let accounts = ReferenceTable::from_entries(
        (0..accounts)
            .map(|i| Account {
                id: i as u32,
                name: format!("a{i}"),
                alias: String::new(),
            })
            .collect(),
    )
    .unwrap();
    Context::from_tables(calendar, accounts, underlyings, instruments).unwrap()
}
