//! The demo strategy loaded as a real shared library
//!
//! This binary owns the global logger, so records emitted from inside the
//! library can be captured and checked.

use std::collections::VecDeque;
use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use hermes_context::Context;
use hermes_core::{Balance, Bar, Event};
use hermes_runner::{Dispatcher, load_extensions};
use hermes_strategy::{ExtensionHost, StrategyConfig};
use log::{LevelFilter, Log, Metadata, Record};
use tempfile::TempDir;

struct Capture {
    lines: Mutex<Vec<String>>,
}

impl Log for Capture {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        self.lines.lock().unwrap().push(record.args().to_string());
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture {
    lines: Mutex::new(Vec::new()),
};

fn install_capture() {
    let _ = log::set_logger(&CAPTURE);
    log::set_max_level(LevelFilter::Debug);
}

fn captured(needle: &str) -> bool {
    CAPTURE
        .lines
        .lock()
        .unwrap()
        .iter()
        .any(|line| line.contains(needle))
}

/// Path of the built demo library, if cargo produced one next to this test
fn demo_library() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("HERMES_DEMO_STRATEGY_LIB") {
        return Some(PathBuf::from(path));
    }
    let exe = std::env::current_exe().ok()?;
    let deps = exe.parent()?;
    let file = format!("{DLL_PREFIX}hermes_demo_strategy{DLL_SUFFIX}");
    [deps, deps.parent()?]
        .into_iter()
        .map(|dir| dir.join(&file))
        .find(|path| path.is_file())
}

fn write_data_folder(dir: &Path) {
    fs::write(
        dir.join("calendar.csv"),
        "id,date,is_trading_day,prev_trading_day,next_trading_day\n\
         0,20240102,1,20231229,20240103\n",
    )
    .unwrap();
    fs::write(dir.join("account.csv"), "id,name,alias\n0,acc001,main\n").unwrap();
    fs::write(
        dir.join("underlying.csv"),
        "id,name,exchange,multiplier,lot_size,tick_size\n0,rb,SHFE,10,1,1\n",
    )
    .unwrap();
    fs::write(
        dir.join("instrument.csv"),
        "id,name,underlying,type,create_date,expire_date,long_margin_ratio,short_margin_ratio\n\
         0,rb2405,rb,futures,20230516,20240515,0.07,0.07\n\
         1,rb2410,rb,futures,20230916,20241015,0.07,0.07\n",
    )
    .unwrap();
}

fn context() -> (TempDir, Context) {
    let data = TempDir::new().unwrap();
    write_data_folder(data.path());
    let context = Context::init(data.path()).unwrap();
    (data, context)
}

fn demo_config(path: &Path, window: usize) -> StrategyConfig {
    let mut config = StrategyConfig::new("demo")
        .with_instruments(["rb2405"])
        .with_accounts(["acc001"])
        .with_value("window", window);
    config.libpath = Some(path.to_path_buf());
    config
}

#[test]
fn test_shared_library_logs_through_host_logger() {
    install_capture();
    let Some(path) = demo_library() else {
        eprintln!("demo strategy library not built, skipping");
        return;
    };
    let (_data, context) = context();

    let host = ExtensionHost::load(&path).unwrap();
    assert_eq!(host.name(), "demo");
    assert_eq!(host.origin(), path.display().to_string());

    let mut dispatcher = Dispatcher::new(VecDeque::<Event>::new(), context);
    dispatcher.attach(host, &demo_config(&path, 3)).unwrap();

    // Emitted by the library's own copy of `log`
    assert!(captured("[ext:demo] Window 3 bars over 1 instruments"));
}

#[test]
fn test_load_extensions_opens_demo_library() {
    install_capture();
    let Some(path) = demo_library() else {
        eprintln!("demo strategy library not built, skipping");
        return;
    };
    let (_data, context) = context();

    let mut events: VecDeque<Event> = [3600.0, 3620.0, 3640.0]
        .into_iter()
        .map(|close| {
            Event::Bar(Bar {
                instrument_id: 0,
                close,
                ..Default::default()
            })
        })
        .collect();
    // Not watched
    events.push_back(Event::Bar(Bar {
        instrument_id: 1,
        close: 3700.0,
        ..Default::default()
    }));
    events.push_back(Event::Balance(Balance {
        account_id: 0,
        balance: 1250.5,
        available: 1000.0,
        ..Default::default()
    }));

    let mut dispatcher = Dispatcher::new(events, context);
    let loaded = load_extensions(&mut dispatcher, &[demo_config(&path, 2)]);
    assert_eq!(loaded, 1);

    assert_eq!(dispatcher.drain(), 5);
    let host = &dispatcher.extensions()[0];
    assert_eq!(host.name(), "demo");
    assert!(!host.is_faulted());
    assert_eq!(host.delivered(), 4);
    assert_eq!(dispatcher.stats().dispatched_callbacks, 4);
    assert!(captured("[ext:demo] Account acc001 balance 1250.50 (available 1000.00)"));
}
