//! C-linkage contract between the host and extension modules
//!
//! A module exports three symbols:
//!
//! - `hermes_strategy_create`: no arguments, returns an opaque
//!   `*mut StrategyHandle` (null on failure)
//! - `hermes_strategy_destroy`: takes that handle and frees it
//! - `hermes_strategy_set_logger` (optional): receives the host's logger and
//!   level filter before `create` runs. A `cdylib` carries its own copy of
//!   the `log` statics, so without it every record the module emits is lost.
//!
//! The handle is a thin pointer to a `Box<dyn Strategy>`. Host and module
//! must be built from the same `hermes-strategy` version and toolchain.
//! Use [`export_strategy!`](crate::export_strategy) to generate all three.

use std::ptr::NonNull;

use crate::strategy::Strategy;

/// Opaque strategy instance owned by the module that created it
#[repr(C)]
pub struct StrategyHandle {
    _private: [u8; 0],
}

/// Exported constructor
pub type CreateFn = unsafe extern "C" fn() -> *mut StrategyHandle;

/// Exported destructor
pub type DestroyFn = unsafe extern "C" fn(*mut StrategyHandle);

/// Exported logger hook
pub type SetLoggerFn = unsafe extern "C" fn(*const HostLogger);

pub const CREATE_SYMBOL: &[u8] = b"hermes_strategy_create\0";
pub const DESTROY_SYMBOL: &[u8] = b"hermes_strategy_destroy\0";
pub const SET_LOGGER_SYMBOL: &[u8] = b"hermes_strategy_set_logger\0";

/// Symbol names without the trailing nul, for diagnostics
pub const CREATE_NAME: &str = "hermes_strategy_create";
pub const DESTROY_NAME: &str = "hermes_strategy_destroy";
pub const SET_LOGGER_NAME: &str = "hermes_strategy_set_logger";

/// The host's `log` backend, handed to a module by pointer
pub struct HostLogger {
    pub logger: &'static dyn log::Log,
    pub level: log::LevelFilter,
}

impl HostLogger {
    /// Whatever logger and level the calling process has installed
    pub fn current() -> Self {
        Self {
            logger: log::logger(),
            level: log::max_level(),
        }
    }
}

/// Route this module's `log` macros to the host's logger
///
/// A module linked into the host shares its `log` statics, in which case
/// the logger is already set and only the level is applied.
///
/// # Safety
///
/// `host` must be null or point to a live [`HostLogger`].
pub unsafe fn install_logger(host: *const HostLogger) {
    // SAFETY: guaranteed by the caller.
    let Some(host) = (unsafe { host.as_ref() }) else {
        return;
    };
    let _ = log::set_logger(host.logger);
    log::set_max_level(host.level);
}

/// Box a strategy behind an opaque handle
pub fn into_handle(strategy: Box<dyn Strategy>) -> *mut StrategyHandle {
    Box::into_raw(Box::new(strategy)).cast()
}

/// Free a handle produced by [`into_handle`]
///
/// # Safety
///
/// `handle` must be null or come from [`into_handle`] and not have been
/// freed already.
pub unsafe fn drop_handle(handle: *mut StrategyHandle) {
    if handle.is_null() {
        return;
    }
    // SAFETY: guaranteed by the caller.
    drop(unsafe { Box::from_raw(handle.cast::<Box<dyn Strategy>>()) });
}

/// Borrow the strategy behind a live handle
///
/// # Safety
///
/// `handle` must come from [`into_handle`], still be live, and not be
/// borrowed elsewhere for `'a`.
pub(crate) unsafe fn strategy_mut<'a>(handle: NonNull<StrategyHandle>) -> &'a mut dyn Strategy {
    // SAFETY: guaranteed by the caller.
    unsafe { &mut **handle.cast::<Box<dyn Strategy>>().as_ptr() }
}

/// Export a strategy type from a `cdylib`
///
/// `$ctor` is a function returning `$ty`. A panic in the constructor is
/// caught and reported to the host as a null handle.
///
/// ```rust,ignore
/// hermes_strategy::export_strategy!(MyStrategy, MyStrategy::new);
/// ```
#[macro_export]
macro_rules! export_strategy {
    ($ty:ty, $ctor:path) => {
        #[unsafe(no_mangle)]
        pub extern "C" fn hermes_strategy_create() -> *mut $crate::abi::StrategyHandle {
            let constructor: fn() -> $ty = $ctor;
            match ::std::panic::catch_unwind(constructor) {
                Ok(strategy) => $crate::abi::into_handle(::std::boxed::Box::new(strategy)),
                Err(_) => ::std::ptr::null_mut(),
            }
        }

        /// # Safety
        ///
        /// `handle` must come from `hermes_strategy_create` of this module.
        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn hermes_strategy_destroy(handle: *mut $crate::abi::StrategyHandle) {
            // SAFETY: forwarded from the caller.
            unsafe { $crate::abi::drop_handle(handle) }
        }

        /// # Safety
        ///
        /// `host` must be null or point to a live `HostLogger`.
        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn hermes_strategy_set_logger(host: *const $crate::abi::HostLogger) {
            // SAFETY: forwarded from the caller.
            unsafe { $crate::abi::install_logger(host) }
        }
    };
}
