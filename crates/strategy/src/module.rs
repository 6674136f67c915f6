//! Where a strategy's entry points come from
//!
//! [`DynamicModule`] resolves them from a shared library at runtime;
//! [`StaticModule`] wraps functions already linked into the process (built-in
//! strategies and tests).

use std::path::{Path, PathBuf};

use libloading::Library;

use crate::abi::{
    CREATE_SYMBOL, CreateFn, DESTROY_SYMBOL, DestroyFn, SET_LOGGER_SYMBOL, SetLoggerFn,
};
use crate::error::ExtensionError;

/// Source of the constructor/destructor pair
pub trait ModuleSource: Send {
    /// Human-readable origin for logs
    fn describe(&self) -> String;

    fn constructor(&self) -> Option<CreateFn>;

    fn destructor(&self) -> Option<DestroyFn>;

    /// Receives the host's logger before construction, when exported
    fn logger_hook(&self) -> Option<SetLoggerFn> {
        None
    }
}

/// A shared library loaded from disk
pub struct DynamicModule {
    path: PathBuf,
    library: Library,
}

impl DynamicModule {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ExtensionError> {
        let path = path.as_ref().to_path_buf();
        // SAFETY: loading runs the library's initializers; modules are
        // trusted code built against this crate.
        let library = unsafe { Library::new(&path) }.map_err(|source| ExtensionError::Load {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path, library })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ModuleSource for DynamicModule {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn constructor(&self) -> Option<CreateFn> {
        // SAFETY: the symbol type is fixed by the module ABI. The copied
        // function pointer is only used while `library` is loaded.
        unsafe { self.library.get::<CreateFn>(CREATE_SYMBOL) }
            .ok()
            .map(|symbol| *symbol)
    }

    fn destructor(&self) -> Option<DestroyFn> {
        // SAFETY: as above.
        unsafe { self.library.get::<DestroyFn>(DESTROY_SYMBOL) }
            .ok()
            .map(|symbol| *symbol)
    }

    fn logger_hook(&self) -> Option<SetLoggerFn> {
        // SAFETY: as above.
        unsafe { self.library.get::<SetLoggerFn>(SET_LOGGER_SYMBOL) }
            .ok()
            .map(|symbol| *symbol)
    }
}

/// Entry points linked into the current binary
pub struct StaticModule {
    name: String,
    create: Option<CreateFn>,
    destroy: Option<DestroyFn>,
    set_logger: Option<SetLoggerFn>,
}

impl StaticModule {
    pub fn new(name: impl Into<String>, create: CreateFn, destroy: DestroyFn) -> Self {
        Self {
            name: name.into(),
            create: Some(create),
            destroy: Some(destroy),
            set_logger: None,
        }
    }

    /// A module with possibly missing entry points
    pub fn partial(
        name: impl Into<String>,
        create: Option<CreateFn>,
        destroy: Option<DestroyFn>,
    ) -> Self {
        Self {
            name: name.into(),
            create,
            destroy,
            set_logger: None,
        }
    }

    pub fn with_logger_hook(mut self, set_logger: SetLoggerFn) -> Self {
        self.set_logger = Some(set_logger);
        self
    }
}

impl ModuleSource for StaticModule {
    fn describe(&self) -> String {
        format!("static:{}", self.name)
    }

    fn constructor(&self) -> Option<CreateFn> {
        self.create
    }

    fn destructor(&self) -> Option<DestroyFn> {
        self.destroy
    }

    fn logger_hook(&self) -> Option<SetLoggerFn> {
        self.set_logger
    }
}
