//! Strategy Trait
//!
//! Defines the interface every extension implements and the [`Setup`] handle
//! a strategy uses during `init` to register interest.

use hermes_context::Context;
use hermes_core::{AccountId, Balance, Bar, Depth, InstrumentId, OrderUpdate, Static, Trade};

use crate::config::StrategyConfig;
use crate::error::StrategyError;
use crate::interest::InterestSet;

/// Strategy trait - implement this for your extension
///
/// Callbacks run synchronously on the dispatcher thread, one event at a time,
/// and only for entities the strategy registered interest in. They must not
/// block. The context passed in has not yet recorded the event being
/// delivered, so `context.depths().back(id)` is the previous snapshot.
pub trait Strategy: Send {
    /// Strategy name for logging
    fn name(&self) -> &str;

    /// Called once after loading; register interest here
    fn init(&mut self, setup: &mut Setup<'_>) -> Result<(), StrategyError>;

    /// Daily static data (optional)
    fn on_static(&mut self, _context: &Context, _fact: &Static) {}

    /// Depth snapshot (optional)
    fn on_depth(&mut self, _context: &Context, _fact: &Depth) {}

    /// Completed bar (optional)
    fn on_bar(&mut self, _context: &Context, _fact: &Bar) {}

    /// Account funds snapshot (optional)
    fn on_balance(&mut self, _context: &Context, _fact: &Balance) {}

    /// Order state change (optional)
    fn on_order_update(&mut self, _context: &Context, _fact: &OrderUpdate) {}

    /// Execution report (optional)
    fn on_trade(&mut self, _context: &Context, _fact: &Trade) {}
}

/// Handle passed to [`Strategy::init`]
pub struct Setup<'a> {
    context: &'a Context,
    config: &'a StrategyConfig,
    instruments: &'a mut InterestSet,
    accounts: &'a mut InterestSet,
}

impl<'a> Setup<'a> {
    pub fn new(
        context: &'a Context,
        config: &'a StrategyConfig,
        instruments: &'a mut InterestSet,
        accounts: &'a mut InterestSet,
    ) -> Self {
        Self {
            context,
            config,
            instruments,
            accounts,
        }
    }

    pub fn context(&self) -> &'a Context {
        self.context
    }

    pub fn config(&self) -> &'a StrategyConfig {
        self.config
    }

    /// Receive instrument-keyed events for `id`
    pub fn watch_instrument(&mut self, id: InstrumentId) -> Result<(), StrategyError> {
        if self.instruments.insert(id) {
            Ok(())
        } else {
            Err(StrategyError::InterestOutOfRange {
                space: "instrument",
                id,
                len: self.instruments.len(),
            })
        }
    }

    /// Receive balance events for `id`
    pub fn watch_account(&mut self, id: AccountId) -> Result<(), StrategyError> {
        if self.accounts.insert(id) {
            Ok(())
        } else {
            Err(StrategyError::InterestOutOfRange {
                space: "account",
                id,
                len: self.accounts.len(),
            })
        }
    }

    /// Watch every instrument and account named in the configuration
    pub fn watch_configured(&mut self) -> Result<(), StrategyError> {
        let context = self.context;
        let config = self.config;
        for name in config.instruments() {
            let id = context
                .instruments()
                .get_id(name)
                .ok_or_else(|| StrategyError::UnknownInstrument(name.clone()))?;
            self.watch_instrument(id)?;
        }
        for name in config.accounts() {
            let id = context
                .accounts()
                .get_id(name)
                .ok_or_else(|| StrategyError::UnknownAccount(name.clone()))?;
            self.watch_account(id)?;
        }
        Ok(())
    }

    pub fn watched_instruments(&self) -> &InterestSet {
        &*self.instruments
    }

    pub fn watched_accounts(&self) -> &InterestSet {
        &*self.accounts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::context;

    #[test]
    fn test_watch_configured_resolves_names() {
        let context = context(3, 2);
        let config = StrategyConfig::new("s")
            .with_instruments(["i2", "i0"])
            .with_accounts(["a1"]);
        let mut instruments = InterestSet::new(3);
        let mut accounts = InterestSet::new(2);

        let mut setup = Setup::new(&context, &config, &mut instruments, &mut accounts);
        setup.watch_configured().unwrap();

        assert!(instruments.contains(0));
        assert!(!instruments.contains(1));
        assert!(instruments.contains(2));
        assert!(accounts.contains(1));
        assert_eq!(accounts.count(), 1);
    }

    #[test]
    fn test_unknown_names_fail() {
        let context = context(1, 1);
        let mut instruments = InterestSet::new(1);
        let mut accounts = InterestSet::new(1);

        let config = StrategyConfig::new("s").with_instruments(["nope"]);
        let mut setup = Setup::new(&context, &config, &mut instruments, &mut accounts);
        assert_eq!(
            setup.watch_configured(),
            Err(StrategyError::UnknownInstrument("nope".to_string()))
        );

        let config = StrategyConfig::new("s").with_accounts(["ghost"]);
        let mut setup = Setup::new(&context, &config, &mut instruments, &mut accounts);
        assert_eq!(
            setup.watch_configured(),
            Err(StrategyError::UnknownAccount("ghost".to_string()))
        );
    }

    #[test]
    fn test_watch_out_of_range() {
        let context = context(1, 1);
        let config = StrategyConfig::new("s");
        let mut instruments = InterestSet::new(1);
        let mut accounts = InterestSet::new(1);
        let mut setup = Setup::new(&context, &config, &mut instruments, &mut accounts);

        assert!(setup.watch_instrument(0).is_ok());
        assert_eq!(
            setup.watch_account(5),
            Err(StrategyError::InterestOutOfRange {
                space: "account",
                id: 5,
                len: 1
            })
        );
    }
}
