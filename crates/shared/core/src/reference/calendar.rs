use serde::{Deserialize, Serialize};

use super::Reference;
use crate::values::{Date, DateId};

/// One row of the trading calendar
///
/// Neighbour links are stored both as dates (as read from the file) and as
/// IDs, resolved once the whole calendar is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDate {
    pub id: DateId,
    /// The date rendered as `yyyymmdd`
    pub name: String,
    pub date: Date,
    pub is_trading_day: bool,
    pub prev_trading_date: Date,
    pub next_trading_date: Date,
    pub prev_trading_day_id: Option<DateId>,
    pub next_trading_day_id: Option<DateId>,
}

impl CalendarDate {
    pub fn new(
        id: DateId,
        date: Date,
        is_trading_day: bool,
        prev_trading_date: Date,
        next_trading_date: Date,
    ) -> Self {
        Self {
            id,
            name: date.to_string(),
            date,
            is_trading_day,
            prev_trading_date,
            next_trading_date,
            prev_trading_day_id: None,
            next_trading_day_id: None,
        }
    }
}

impl Reference for CalendarDate {
    fn id(&self) -> DateId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
