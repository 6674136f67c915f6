use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Listing venue of an underlying
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Exchange {
    /// Shanghai Stock Exchange
    Xshg = 0,
    /// Shenzhen Stock Exchange
    Xshe = 1,
    /// Shanghai Futures Exchange
    Shfe = 2,
    /// Dalian Commodity Exchange
    Dce = 3,
    /// Zhengzhou Commodity Exchange
    Czce = 4,
    /// China Financial Futures Exchange
    Ffex = 5,
    /// Shanghai International Energy Exchange
    Ine = 6,
    /// Guangzhou Futures Exchange
    Gfex = 7,
}

impl Exchange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Exchange::Xshg => "XSHG",
            Exchange::Xshe => "XSHE",
            Exchange::Shfe => "SHFE",
            Exchange::Dce => "DCE",
            Exchange::Czce => "CZCE",
            Exchange::Ffex => "FFEX",
            Exchange::Ine => "INE",
            Exchange::Gfex => "GFEX",
        }
    }

    /// True for the futures venues
    pub fn is_futures(&self) -> bool {
        !matches!(self, Exchange::Xshg | Exchange::Xshe)
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Exchange {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let exchange = match s.trim() {
            "XSHG" => Exchange::Xshg,
            "XSHE" => Exchange::Xshe,
            "SHFE" => Exchange::Shfe,
            "DCE" => Exchange::Dce,
            "CZCE" => Exchange::Czce,
            "FFEX" => Exchange::Ffex,
            "INE" => Exchange::Ine,
            "GFEX" => Exchange::Gfex,
            other => {
                return Err(ParseError::UnknownLabel {
                    kind: "exchange",
                    label: other.to_string(),
                });
            }
        };
        Ok(exchange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("SHFE".parse::<Exchange>().unwrap(), Exchange::Shfe);
        assert_eq!(" DCE ".parse::<Exchange>().unwrap(), Exchange::Dce);
        assert!("shfe".parse::<Exchange>().is_err());
    }

    #[test]
    fn test_is_futures() {
        assert!(Exchange::Ine.is_futures());
        assert!(!Exchange::Xshe.is_futures());
    }
}
