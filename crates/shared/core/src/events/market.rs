//! Market data payloads

use crate::values::{Date, InstrumentId, LargeVolume, Money, Price, Timestamp, Volume};

/// Number of price levels carried by a depth snapshot
pub const DEPTH_LEVELS: usize = 5;

/// One OHLCV bar for an instrument
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bar {
    pub trading_day: Date,
    pub update_time: Timestamp,
    pub instrument_id: InstrumentId,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Volume,
    pub turnover: Money,
}

/// Daily static data published before the session opens
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Static {
    pub trading_day: Date,
    pub instrument_id: InstrumentId,
    pub prev_close: Price,
    pub upper_limit: Price,
    pub lower_limit: Price,
}

/// Top-of-book snapshot with five levels per side
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Depth {
    pub update_time: Timestamp,
    pub instrument_id: InstrumentId,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub last: Price,
    pub open_interest: LargeVolume,
    pub volume: Volume,
    pub turnover: Money,
    pub ask_price: [Price; DEPTH_LEVELS],
    pub bid_price: [Price; DEPTH_LEVELS],
    pub ask_volume: [Volume; DEPTH_LEVELS],
    pub bid_volume: [Volume; DEPTH_LEVELS],
}

impl Bar {
    /// Close-to-open change of the bar
    pub fn change(&self) -> Price {
        self.close - self.open
    }
}

impl Static {
    /// True if `price` lies inside the daily limit band
    pub fn within_limits(&self, price: Price) -> bool {
        price >= self.lower_limit && price <= self.upper_limit
    }
}

impl Depth {
    /// Best ask, `None` if the level is empty
    pub fn best_ask(&self) -> Option<Price> {
        (self.ask_volume[0] > 0).then_some(self.ask_price[0])
    }

    /// Best bid, `None` if the level is empty
    pub fn best_bid(&self) -> Option<Price> {
        (self.bid_volume[0] > 0).then_some(self.bid_price[0])
    }

    /// Mid price when both sides are quoted
    pub fn mid(&self) -> Option<Price> {
        Some((self.best_ask()? + self.best_bid()?) / 2.0)
    }

    /// Ask minus bid when both sides are quoted
    pub fn spread(&self) -> Option<Price> {
        Some(self.best_ask()? - self.best_bid()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_quotes() {
        let mut depth = Depth::default();
        assert_eq!(depth.mid(), None);

        depth.ask_price[0] = 101.0;
        depth.ask_volume[0] = 3;
        depth.bid_price[0] = 99.0;
        depth.bid_volume[0] = 1;
        assert_eq!(depth.best_ask(), Some(101.0));
        assert_eq!(depth.best_bid(), Some(99.0));
        assert_eq!(depth.mid(), Some(100.0));
        assert_eq!(depth.spread(), Some(2.0));
    }

    #[test]
    fn test_static_limits() {
        let st = Static {
            lower_limit: 90.0,
            upper_limit: 110.0,
            ..Default::default()
        };
        assert!(st.within_limits(90.0));
        assert!(st.within_limits(110.0));
        assert!(!st.within_limits(110.5));
    }
}
