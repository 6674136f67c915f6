use crate::values::{AccountId, Money};

/// Funds snapshot of a trading account
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Balance {
    pub account_id: AccountId,
    pub balance: Money,
    pub available: Money,
    pub cur_margin: Money,
    pub frozen_margin: Money,
}

impl Balance {
    /// Margin currently tied up, used plus frozen
    pub fn total_margin(&self) -> Money {
        self.cur_margin + self.frozen_margin
    }
}
