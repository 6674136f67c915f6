//! Extension host
//!
//! Owns one strategy instance together with the module that created it and
//! the strategy's interest sets. Callbacks are delivered only for entities
//! in the matching interest set. A panicking callback is caught and the
//! extension is marked faulted; it receives nothing afterwards.
//!
//! Teardown runs the module's destructor in `Drop`, before the module field
//! itself is dropped and the library unloaded.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use std::ptr::NonNull;

use hermes_context::Context;
use hermes_core::{AccountId, Balance, Bar, Depth, InstrumentId, OrderUpdate, Static, Trade};

use crate::abi::{
    CREATE_NAME, DESTROY_NAME, DestroyFn, HostLogger, StrategyHandle, strategy_mut,
};
use crate::config::StrategyConfig;
use crate::error::ExtensionError;
use crate::interest::InterestSet;
use crate::module::{DynamicModule, ModuleSource};
use crate::strategy::{Setup, Strategy};

/// A loaded strategy and its interest registration
pub struct ExtensionHost {
    name: String,
    origin: String,
    handle: NonNull<StrategyHandle>,
    destroy: DestroyFn,
    instruments: InterestSet,
    accounts: InterestSet,
    faulted: bool,
    delivered: u64,
    // Must stay the last field: dropped (unloaded) after `destroy` has run
    _module: Box<dyn ModuleSource>,
}

// The strategy is `Send` and only reached through `&mut self`.
unsafe impl Send for ExtensionHost {}

impl ExtensionHost {
    /// Load a shared library and construct its strategy
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ExtensionError> {
        let module = DynamicModule::open(path)?;
        Self::from_module(Box::new(module))
    }

    /// Resolve the entry points from `module` and construct one instance
    pub fn from_module(module: Box<dyn ModuleSource>) -> Result<Self, ExtensionError> {
        let origin = module.describe();
        let create = module
            .constructor()
            .ok_or_else(|| ExtensionError::MissingSymbol {
                module: origin.clone(),
                symbol: CREATE_NAME,
            })?;
        let destroy = module
            .destructor()
            .ok_or_else(|| ExtensionError::MissingSymbol {
                module: origin.clone(),
                symbol: DESTROY_NAME,
            })?;

        match module.logger_hook() {
            Some(set_logger) => {
                let host_logger = HostLogger::current();
                // SAFETY: `set_logger` follows the module ABI and only reads
                // `host_logger` for the duration of the call.
                unsafe { set_logger(&host_logger) };
            }
            None => log::debug!("[ext] {} does not export a logger hook", origin),
        }

        // SAFETY: `create` follows the module ABI.
        let raw = unsafe { create() };
        let handle =
            NonNull::new(raw).ok_or_else(|| ExtensionError::ConstructionFailed(origin.clone()))?;
        // SAFETY: freshly created, exclusively owned handle.
        let name = unsafe { strategy_mut(handle) }.name().to_string();
        log::info!("[ext:{}] Loaded from {}", name, origin);

        Ok(Self {
            name,
            origin,
            handle,
            destroy,
            instruments: InterestSet::default(),
            accounts: InterestSet::default(),
            faulted: false,
            delivered: 0,
            _module: module,
        })
    }

    /// Size the interest sets from `context` and run the strategy's `init`
    pub fn init(&mut self, context: &Context, config: &StrategyConfig) -> Result<(), ExtensionError> {
        self.instruments = InterestSet::new(context.instruments().count());
        self.accounts = InterestSet::new(context.accounts().count());

        let handle = self.handle;
        let mut setup = Setup::new(context, config, &mut self.instruments, &mut self.accounts);
        // SAFETY: the handle is live for the lifetime of `self`.
        let strategy = unsafe { strategy_mut(handle) };
        let result = catch_unwind(AssertUnwindSafe(|| strategy.init(&mut setup)));

        match result {
            Ok(Ok(())) => {
                log::info!(
                    "[ext:{}] Initialized, watching {} instruments and {} accounts",
                    self.name,
                    self.instruments.count(),
                    self.accounts.count()
                );
                Ok(())
            }
            Ok(Err(source)) => Err(ExtensionError::Init {
                name: self.name.clone(),
                source,
            }),
            Err(_) => {
                self.faulted = true;
                Err(ExtensionError::Panicked {
                    name: self.name.clone(),
                    callback: "init",
                })
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the strategy was loaded from
    pub fn origin(&self) -> &str {
        &self.origin
    }

    #[inline]
    pub fn is_instrument_interested(&self, id: InstrumentId) -> bool {
        self.instruments.contains(id)
    }

    #[inline]
    pub fn is_account_interested(&self, id: AccountId) -> bool {
        self.accounts.contains(id)
    }

    pub fn instruments(&self) -> &InterestSet {
        &self.instruments
    }

    pub fn accounts(&self) -> &InterestSet {
        &self.accounts
    }

    /// True once a callback has panicked
    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    /// Callbacks delivered so far
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Deliver a static if the instrument is watched; returns whether it was
    pub fn on_static(&mut self, context: &Context, fact: &Static) -> bool {
        self.is_instrument_interested(fact.instrument_id)
            && self.invoke("on_static", |s| s.on_static(context, fact))
    }

    pub fn on_depth(&mut self, context: &Context, fact: &Depth) -> bool {
        self.is_instrument_interested(fact.instrument_id)
            && self.invoke("on_depth", |s| s.on_depth(context, fact))
    }

    pub fn on_bar(&mut self, context: &Context, fact: &Bar) -> bool {
        self.is_instrument_interested(fact.instrument_id)
            && self.invoke("on_bar", |s| s.on_bar(context, fact))
    }

    pub fn on_balance(&mut self, context: &Context, fact: &Balance) -> bool {
        self.is_account_interested(fact.account_id)
            && self.invoke("on_balance", |s| s.on_balance(context, fact))
    }

    pub fn on_order_update(&mut self, context: &Context, fact: &OrderUpdate) -> bool {
        self.is_instrument_interested(fact.instrument_id)
            && self.invoke("on_order_update", |s| s.on_order_update(context, fact))
    }

    pub fn on_trade(&mut self, context: &Context, fact: &Trade) -> bool {
        self.is_instrument_interested(fact.instrument_id)
            && self.invoke("on_trade", |s| s.on_trade(context, fact))
    }

    fn invoke(&mut self, callback: &'static str, f: impl FnOnce(&mut dyn Strategy)) -> bool {
        if self.faulted {
            return false;
        }
        // SAFETY: the handle is live for the lifetime of `self`.
        let strategy = unsafe { strategy_mut(self.handle) };
        match catch_unwind(AssertUnwindSafe(|| f(strategy))) {
            Ok(()) => {
                self.delivered += 1;
                true
            }
            Err(_) => {
                self.faulted = true;
                log::error!(
                    "[ext:{}] Panicked in {}, no further events will be delivered",
                    self.name,
                    callback
                );
                false
            }
        }
    }
}

impl Drop for ExtensionHost {
    fn drop(&mut self) {
        // SAFETY: the handle came from this module's constructor and is
        // destroyed exactly once, while the module is still loaded.
        unsafe { (self.destroy)(self.handle.as_ptr()) };
        log::debug!("[ext:{}] Destroyed", self.name);
    }
}

impl std::fmt::Debug for ExtensionHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionHost")
            .field("name", &self.name)
            .field("origin", &self.origin)
            .field("instruments", &self.instruments.count())
            .field("accounts", &self.accounts.count())
            .field("faulted", &self.faulted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::abi::{StrategyHandle, drop_handle, into_handle};
    use crate::error::StrategyError;
    use crate::module::StaticModule;
    use crate::testing::context;

    static DESTROYED: AtomicUsize = AtomicUsize::new(0);
    // Serializes tests that read DESTROYED
    static LOCK: Mutex<()> = Mutex::new(());

    /// Watches instrument 1 and account 0, panics on bars
    #[derive(Default)]
    struct Watcher {
        depths: usize,
    }

    impl Strategy for Watcher {
        fn name(&self) -> &str {
            "watcher"
        }

        fn init(&mut self, setup: &mut Setup<'_>) -> Result<(), StrategyError> {
            setup.watch_instrument(1)?;
            setup.watch_account(0)
        }

        fn on_depth(&mut self, _context: &Context, _fact: &Depth) {
            self.depths += 1;
        }

        fn on_bar(&mut self, _context: &Context, _fact: &Bar) {
            panic!("bar handling is broken");
        }
    }

    struct FailsInit;

    impl Strategy for FailsInit {
        fn name(&self) -> &str {
            "fails_init"
        }

        fn init(&mut self, _setup: &mut Setup<'_>) -> Result<(), StrategyError> {
            Err(StrategyError::InvalidConfig("window missing".to_string()))
        }
    }

    unsafe extern "C" fn create_watcher() -> *mut StrategyHandle {
        into_handle(Box::new(Watcher::default()))
    }

    unsafe extern "C" fn create_fails_init() -> *mut StrategyHandle {
        into_handle(Box::new(FailsInit))
    }

    unsafe extern "C" fn create_null() -> *mut StrategyHandle {
        std::ptr::null_mut()
    }

    unsafe extern "C" fn destroy(handle: *mut StrategyHandle) {
        DESTROYED.fetch_add(1, Ordering::SeqCst);
        unsafe { drop_handle(handle) };
    }

    fn watcher_host() -> ExtensionHost {
        ExtensionHost::from_module(Box::new(StaticModule::new("watcher", create_watcher, destroy)))
            .unwrap()
    }

    #[test]
    fn test_interest_filters_callbacks() {
        let _guard = LOCK.lock().unwrap();
        let context = context(3, 2);
        let mut host = watcher_host();
        host.init(&context, &StrategyConfig::new("watcher")).unwrap();

        assert_eq!(host.name(), "watcher");
        assert!(host.is_instrument_interested(1));
        assert!(!host.is_instrument_interested(0));
        assert!(!host.is_instrument_interested(42));
        assert!(host.is_account_interested(0));
        assert!(!host.is_account_interested(1));

        let watched = Depth {
            instrument_id: 1,
            ..Default::default()
        };
        let ignored = Depth {
            instrument_id: 2,
            ..Default::default()
        };
        assert!(host.on_depth(&context, &watched));
        assert!(!host.on_depth(&context, &ignored));
        assert!(!host.on_balance(
            &context,
            &Balance {
                account_id: 1,
                ..Default::default()
            }
        ));
        assert_eq!(host.delivered(), 1);
    }

    #[test]
    fn test_panicking_callback_faults_extension() {
        let _guard = LOCK.lock().unwrap();
        let context = context(3, 2);
        let mut host = watcher_host();
        host.init(&context, &StrategyConfig::new("watcher")).unwrap();

        let bar = Bar {
            instrument_id: 1,
            ..Default::default()
        };
        assert!(!host.on_bar(&context, &bar));
        assert!(host.is_faulted());

        let depth = Depth {
            instrument_id: 1,
            ..Default::default()
        };
        assert!(!host.on_depth(&context, &depth));
        assert_eq!(host.delivered(), 0);
    }

    #[test]
    fn test_missing_destructor_fails_load() {
        let module = StaticModule::partial("no-dtor", Some(create_watcher), None);
        let err = ExtensionHost::from_module(Box::new(module)).unwrap_err();
        assert!(matches!(
            err,
            ExtensionError::MissingSymbol {
                symbol: "hermes_strategy_destroy",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_constructor_fails_load() {
        let module = StaticModule::partial("no-ctor", None, Some(destroy));
        let err = ExtensionHost::from_module(Box::new(module)).unwrap_err();
        assert!(matches!(
            err,
            ExtensionError::MissingSymbol {
                symbol: "hermes_strategy_create",
                ..
            }
        ));
    }

    #[test]
    fn test_null_handle_is_construction_failure() {
        let module = StaticModule::new("null", create_null, destroy);
        let err = ExtensionHost::from_module(Box::new(module)).unwrap_err();
        assert!(matches!(err, ExtensionError::ConstructionFailed(_)));
    }

    #[test]
    fn test_failed_init_reports_and_still_destroys() {
        let _guard = LOCK.lock().unwrap();
        let context = context(1, 1);
        let before = DESTROYED.load(Ordering::SeqCst);

        let mut host =
            ExtensionHost::from_module(Box::new(StaticModule::new("f", create_fails_init, destroy)))
                .unwrap();
        let err = host.init(&context, &StrategyConfig::new("f")).unwrap_err();
        assert!(matches!(
            err,
            ExtensionError::Init {
                source: StrategyError::InvalidConfig(_),
                ..
            }
        ));

        drop(host);
        assert_eq!(DESTROYED.load(Ordering::SeqCst), before + 1);
    }

    // Order in which the module entry points ran; guarded by LOCK
    static CALLS: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());
    static HOOK_LEVEL: Mutex<Option<log::LevelFilter>> = Mutex::new(None);

    unsafe extern "C" fn record_logger(host: *const HostLogger) {
        let host = unsafe { &*host };
        *HOOK_LEVEL.lock().unwrap() = Some(host.level);
        CALLS.lock().unwrap().push("set_logger");
    }

    unsafe extern "C" fn create_recorded() -> *mut StrategyHandle {
        CALLS.lock().unwrap().push("create");
        into_handle(Box::new(Watcher::default()))
    }

    #[test]
    fn test_logger_hook_runs_before_create() {
        let _guard = LOCK.lock().unwrap();
        CALLS.lock().unwrap().clear();

        let module =
            StaticModule::new("logged", create_recorded, destroy).with_logger_hook(record_logger);
        let host = ExtensionHost::from_module(Box::new(module)).unwrap();

        assert_eq!(*CALLS.lock().unwrap(), vec!["set_logger", "create"]);
        assert_eq!(*HOOK_LEVEL.lock().unwrap(), Some(log::max_level()));
        drop(host);
    }

    #[test]
    fn test_module_without_logger_hook_still_loads() {
        let _guard = LOCK.lock().unwrap();
        CALLS.lock().unwrap().clear();

        let host =
            ExtensionHost::from_module(Box::new(StaticModule::new("plain", create_recorded, destroy)))
                .unwrap();
        assert_eq!(*CALLS.lock().unwrap(), vec!["create"]);
        assert_eq!(host.name(), "watcher");
    }
}
