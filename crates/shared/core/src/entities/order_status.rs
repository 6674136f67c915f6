use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Order lifecycle status as reported by the venue
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Completely filled
    AllTraded = 0,
    /// Partially filled, remainder still queued
    PartTradedQueueing = 1,
    /// Partially filled, remainder no longer queued
    PartTradedNotQueueing = 2,
    /// Not filled, queued
    NoTradeQueueing = 3,
    /// Not filled, not queued
    NoTradeNotQueueing = 4,
    /// Canceled
    Canceled = 5,
    #[default]
    Unknown = 6,
    /// Conditional order not yet triggered
    NotTouched = 7,
    /// Conditional order triggered
    Touched = 8,
}

impl OrderStatus {
    /// Returns true if the order can no longer change
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::AllTraded
                | OrderStatus::PartTradedNotQueueing
                | OrderStatus::NoTradeNotQueueing
                | OrderStatus::Canceled
        )
    }

    /// Returns true if the order is resting on the book
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            OrderStatus::PartTradedQueueing | OrderStatus::NoTradeQueueing
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::AllTraded => "all_traded",
            OrderStatus::PartTradedQueueing => "part_traded_queueing",
            OrderStatus::PartTradedNotQueueing => "part_traded_not_queueing",
            OrderStatus::NoTradeQueueing => "no_trade_queueing",
            OrderStatus::NoTradeNotQueueing => "no_trade_not_queueing",
            OrderStatus::Canceled => "canceled",
            OrderStatus::Unknown => "unknown",
            OrderStatus::NotTouched => "not_touched",
            OrderStatus::Touched => "touched",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s.trim() {
            "all_traded" => OrderStatus::AllTraded,
            "part_traded_queueing" => OrderStatus::PartTradedQueueing,
            "part_traded_not_queueing" => OrderStatus::PartTradedNotQueueing,
            "no_trade_queueing" => OrderStatus::NoTradeQueueing,
            "no_trade_not_queueing" => OrderStatus::NoTradeNotQueueing,
            "canceled" => OrderStatus::Canceled,
            "unknown" => OrderStatus::Unknown,
            "not_touched" => OrderStatus::NotTouched,
            "touched" => OrderStatus::Touched,
            other => {
                return Err(ParseError::UnknownLabel {
                    kind: "order status",
                    label: other.to_string(),
                });
            }
        };
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_and_active_are_disjoint() {
        let all = [
            OrderStatus::AllTraded,
            OrderStatus::PartTradedQueueing,
            OrderStatus::PartTradedNotQueueing,
            OrderStatus::NoTradeQueueing,
            OrderStatus::NoTradeNotQueueing,
            OrderStatus::Canceled,
            OrderStatus::Unknown,
            OrderStatus::NotTouched,
            OrderStatus::Touched,
        ];
        for status in all {
            assert!(!(status.is_terminal() && status.is_active()));
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }
}
