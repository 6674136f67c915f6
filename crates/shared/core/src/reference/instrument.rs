use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Reference;
use crate::entities::InstrumentType;
use crate::values::{Date, InstrumentId, UnderlyingId};

/// Tradable contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub id: InstrumentId,
    /// Contract code, e.g. `rb2405`
    pub name: String,
    /// Name of the underlying as written in the reference file
    pub underlying: String,
    /// Resolved against the underlying table after load
    pub underlying_id: Option<UnderlyingId>,
    pub kind: InstrumentType,
    pub create_date: Date,
    pub expire_date: Date,
    pub long_margin_ratio: Decimal,
    pub short_margin_ratio: Decimal,
}

impl Instrument {
    /// True if the contract is listed and unexpired on `date`
    pub fn is_listed_on(&self, date: Date) -> bool {
        date >= self.create_date && (self.expire_date.as_i32() == 0 || date <= self.expire_date)
    }
}

impl Reference for Instrument {
    fn id(&self) -> InstrumentId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
