use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Calendar date stored as a `yyyymmdd` integer
///
/// Four bytes, `Copy`, pointer-free: it can live inside channel events.
/// A zero value means "no date".
#[repr(transparent)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Date(i32);

impl Date {
    /// Create a date from its `yyyymmdd` representation (not validated)
    pub const fn new(yyyymmdd: i32) -> Self {
        Self(yyyymmdd)
    }

    /// Raw `yyyymmdd` value
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    pub const fn year(self) -> i32 {
        self.0 / 10000
    }

    pub const fn month(self) -> u32 {
        (self.0 / 100 % 100) as u32
    }

    pub const fn day(self) -> u32 {
        (self.0 % 100) as u32
    }

    /// True when the value names a real calendar day
    pub fn is_valid(self) -> bool {
        self.to_naive().is_some()
    }

    /// Convert to a chrono date, `None` if the value is not a real day
    pub fn to_naive(self) -> Option<NaiveDate> {
        if self.0 <= 0 {
            return None;
        }
        NaiveDate::from_ymd_opt(self.year(), self.month(), self.day())
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date.year() * 10000 + date.month() as i32 * 100 + date.day() as i32)
    }

    /// Day of week, `None` for an invalid date
    pub fn weekday(self) -> Option<Weekday> {
        self.to_naive().map(|d| d.weekday())
    }

    /// Shift by a (possibly negative) number of calendar days
    pub fn add_days(self, days: i64) -> Option<Self> {
        let date = self.to_naive()?;
        let shifted = if days >= 0 {
            date.checked_add_days(Days::new(days as u64))
        } else {
            date.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        shifted.map(Self::from_naive)
    }

    /// Local calendar date of the host
    pub fn today() -> Self {
        Self::from_naive(Local::now().date_naive())
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Date {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: i32 = s
            .trim()
            .parse()
            .map_err(|_| ParseError::InvalidDate(s.to_string()))?;
        let date = Date::new(raw);
        if !date.is_valid() {
            return Err(ParseError::InvalidDate(s.to_string()));
        }
        Ok(date)
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Self::from_naive(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components() {
        let date = Date::new(20230315);
        assert_eq!(date.year(), 2023);
        assert_eq!(date.month(), 3);
        assert_eq!(date.day(), 15);
        assert_eq!(date.to_string(), "20230315");
    }

    #[test]
    fn test_validity() {
        assert!(Date::new(20240229).is_valid());
        assert!(!Date::new(20230229).is_valid());
        assert!(!Date::new(0).is_valid());
        assert!(!Date::default().is_valid());
    }

    #[test]
    fn test_add_days_crosses_month_and_year() {
        assert_eq!(Date::new(20230131).add_days(1), Some(Date::new(20230201)));
        assert_eq!(Date::new(20240101).add_days(-1), Some(Date::new(20231231)));
        assert_eq!(Date::new(0).add_days(1), None);
    }

    #[test]
    fn test_weekday() {
        assert_eq!(Date::new(20230101).weekday(), Some(Weekday::Sun));
        assert_eq!(Date::new(20230102).weekday(), Some(Weekday::Mon));
    }

    #[test]
    fn test_parse() {
        assert_eq!("20230102".parse::<Date>().unwrap(), Date::new(20230102));
        assert!("2023-01-02".parse::<Date>().is_err());
        assert!("20231340".parse::<Date>().is_err());
    }

    #[test]
    fn test_ordering_follows_calendar() {
        assert!(Date::new(20221231) < Date::new(20230101));
    }

    #[test]
    fn test_serde_as_plain_integer() {
        let date = Date::new(20240102);
        assert_eq!(serde_json::to_string(&date).unwrap(), "20240102");
        assert_eq!(serde_json::from_str::<Date>("20240102").unwrap(), date);
    }
}
