//! Demo extension
//!
//! Watches the configured instruments and accounts, keeps the last traded
//! price per instrument from depth snapshots, and computes the close-to-close
//! return over the last `window` bars (default 20) from the context's bar
//! series. Balance changes are logged.
//!
//! Configuration entry:
//!
//! ```json
//! { "name": "demo", "libpath": "./libhermes_demo_strategy.so",
//!   "instruments": ["rb2405"], "accounts": ["acc001"], "window": 20 }
//! ```

use std::collections::HashMap;

use hermes_context::Context;
use hermes_core::{AccountId, Balance, Bar, Depth, InstrumentId, Money, Price};
use hermes_strategy::{Setup, Strategy, StrategyError, export_strategy};

pub const DEFAULT_WINDOW: usize = 20;

#[derive(Debug)]
pub struct DemoStrategy {
    window: usize,
    last_prices: HashMap<InstrumentId, Price>,
    returns: HashMap<InstrumentId, f64>,
    balances: HashMap<AccountId, Money>,
}

impl Default for DemoStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoStrategy {
    pub fn new() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            last_prices: HashMap::new(),
            returns: HashMap::new(),
            balances: HashMap::new(),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Last traded price seen for `id`
    pub fn last_price(&self, id: InstrumentId) -> Option<Price> {
        self.last_prices.get(&id).copied()
    }

    /// Close-to-close return over the last `window` bars, once enough history exists
    pub fn rolling_return(&self, id: InstrumentId) -> Option<f64> {
        self.returns.get(&id).copied()
    }

    pub fn balance(&self, id: AccountId) -> Option<Money> {
        self.balances.get(&id).copied()
    }
}

/// Return from the close `window` bars back to `bar`
///
/// The context has not stored `bar` yet, so the reference close is the
/// `window - 1`-th newest stored one.
fn close_to_close(context: &Context, bar: &Bar, window: usize) -> Option<f64> {
    let bars = context.bars();
    if bars.size(bar.instrument_id) < window {
        return None;
    }
    let base = bars.reverse_nth(bar.instrument_id, window - 1).ok()?.close;
    (base != 0.0).then(|| bar.close / base - 1.0)
}

impl Strategy for DemoStrategy {
    fn name(&self) -> &str {
        "demo"
    }

    fn init(&mut self, setup: &mut Setup<'_>) -> Result<(), StrategyError> {
        let window: usize = setup.config().get_or("window", DEFAULT_WINDOW)?;
        let capacity = setup.context().bars().capacity();
        if window == 0 || window > capacity {
            return Err(StrategyError::InvalidConfig(format!(
                "window must be within 1..={capacity}, got {window}"
            )));
        }
        self.window = window;
        setup.watch_configured()?;
        log::info!(
            "[ext:demo] Window {} bars over {} instruments",
            self.window,
            setup.watched_instruments().count()
        );
        Ok(())
    }

    fn on_depth(&mut self, _context: &Context, fact: &Depth) {
        self.last_prices.insert(fact.instrument_id, fact.last);
    }

    fn on_bar(&mut self, context: &Context, fact: &Bar) {
        if let Some(ret) = close_to_close(context, fact, self.window) {
            self.returns.insert(fact.instrument_id, ret);
            let name = context
                .instruments()
                .get(fact.instrument_id)
                .map_or("?", |i| i.name.as_str());
            log::debug!(
                "[ext:demo] {} {}-bar return {:.4}%",
                name,
                self.window,
                ret * 100.0
            );
        }
    }

    fn on_balance(&mut self, context: &Context, fact: &Balance) {
        let previous = self.balances.insert(fact.account_id, fact.balance);
        if previous != Some(fact.balance) {
            let name = context
                .accounts()
                .get(fact.account_id)
                .map_or("?", |a| a.name.as_str());
            log::info!(
                "[ext:demo] Account {} balance {:.2} (available {:.2})",
                name,
                fact.balance,
                fact.available
            );
        }
    }
}

export_strategy!(DemoStrategy, DemoStrategy::new);
