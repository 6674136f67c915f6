use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::Reference;
use crate::entities::Exchange;
use crate::values::{Price, UnderlyingId};

/// Product family shared by a set of instruments (e.g. rebar futures)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Underlying {
    pub id: UnderlyingId,
    pub name: String,
    pub exchange: Exchange,
    /// Contract multiplier
    pub multiplier: i32,
    /// Minimum order size
    pub lot_size: i32,
    /// Minimum price increment
    pub tick_size: Decimal,
}

impl Underlying {
    /// Snap a price to the nearest multiple of the tick size
    pub fn round_price(&self, price: Price) -> Price {
        if self.tick_size.is_zero() {
            return price;
        }
        let Some(raw) = Decimal::from_f64_retain(price) else {
            return price;
        };
        let ticks = (raw / self.tick_size).round();
        (ticks * self.tick_size).to_f64().unwrap_or(price)
    }

    /// Notional value of `volume` contracts at `price`
    pub fn notional(&self, price: Price, volume: i32) -> Price {
        price * f64::from(volume) * f64::from(self.multiplier)
    }
}

impl Reference for Underlying {
    fn id(&self) -> UnderlyingId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
