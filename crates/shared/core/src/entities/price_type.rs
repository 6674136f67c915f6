use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Pricing instruction attached to a new order
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceType {
    /// Execute at the best available price
    Market = 0,
    /// Execute at the given price or better
    #[default]
    Limit = 1,
}

impl PriceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceType::Market => "market",
            PriceType::Limit => "limit",
        }
    }
}

impl fmt::Display for PriceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "market" => Ok(PriceType::Market),
            "limit" => Ok(PriceType::Limit),
            other => Err(ParseError::UnknownLabel {
                kind: "price type",
                label: other.to_string(),
            }),
        }
    }
}
