use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Kind of a listed instrument
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentType {
    Stock = 0,
    Index = 1,
    /// Exchange traded fund
    Etf = 2,
    /// Listed open-ended fund
    Lof = 3,
    /// Convertible bond
    Convertable = 4,
    Spot = 5,
    Futures = 6,
    Options = 7,
    Repo = 8,
}

impl InstrumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentType::Stock => "stock",
            InstrumentType::Index => "index",
            InstrumentType::Etf => "etf",
            InstrumentType::Lof => "lof",
            InstrumentType::Convertable => "convertable",
            InstrumentType::Spot => "spot",
            InstrumentType::Futures => "futures",
            InstrumentType::Options => "options",
            InstrumentType::Repo => "repo",
        }
    }

    /// True for instruments that expire
    pub fn is_derivative(&self) -> bool {
        matches!(self, InstrumentType::Futures | InstrumentType::Options)
    }
}

impl fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstrumentType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim() {
            "stock" => InstrumentType::Stock,
            "index" => InstrumentType::Index,
            "etf" => InstrumentType::Etf,
            "lof" => InstrumentType::Lof,
            "convertable" => InstrumentType::Convertable,
            "spot" => InstrumentType::Spot,
            "futures" => InstrumentType::Futures,
            "options" => InstrumentType::Options,
            "repo" => InstrumentType::Repo,
            other => {
                return Err(ParseError::UnknownLabel {
                    kind: "instrument type",
                    label: other.to_string(),
                });
            }
        };
        Ok(kind)
    }
}
