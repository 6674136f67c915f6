//! Runtime bootstrap: context, channel, extensions
//!
//! Startup order matters. The context is loaded first because extensions
//! resolve their interests against it; the channel reader is opened next;
//! extensions are loaded and initialized last, in configuration order.

use hermes_channel::{ChannelReader, EventSource};
use hermes_context::Context;
use hermes_strategy::{ExtensionHost, StrategyConfig};

use crate::config::RuntimeConfig;
use crate::dispatcher::Dispatcher;
use crate::error::RunnerError;

/// Build a dispatcher reading from the configured channel
///
/// A missing or malformed reference table, or a channel that never appears,
/// is fatal. An extension that fails to load or initialize is logged and
/// skipped.
pub fn bootstrap(config: &RuntimeConfig) -> Result<Dispatcher<ChannelReader>, RunnerError> {
    config.validate()?;

    log::info!(
        "[bootstrap] Loading context from {}",
        config.data_folder.display()
    );
    let context = Context::init(&config.data_folder)?;

    log::info!(
        "[bootstrap] Opening channel {} (capacity {})",
        config.channel.name,
        config.channel.capacity
    );
    let reader = ChannelReader::open_with_wait(&config.channel, config.open_timeout())?;

    let mut dispatcher = Dispatcher::new(reader, context).with_idle(config.idle.clone());
    let loaded = load_extensions(&mut dispatcher, &config.strategies);
    log::info!(
        "[bootstrap] {} of {} configured extensions ready",
        loaded,
        config.strategies.len()
    );
    Ok(dispatcher)
}

/// Load and attach every enabled strategy in order; returns how many succeeded
pub fn load_extensions<S: EventSource>(
    dispatcher: &mut Dispatcher<S>,
    strategies: &[StrategyConfig],
) -> usize {
    let mut loaded = 0;
    for strategy in strategies {
        if !strategy.enabled {
            log::info!("[bootstrap] Strategy {} disabled, skipping", strategy.name);
            continue;
        }
        let Some(path) = strategy.libpath.as_ref() else {
            log::error!("[bootstrap] Strategy {} has no libpath", strategy.name);
            continue;
        };

        let attached = ExtensionHost::load(path).and_then(|host| dispatcher.attach(host, strategy));
        match attached {
            Ok(()) => loaded += 1,
            Err(e) => log::error!(
                "[bootstrap] Skipping strategy {}: {}",
                strategy.name,
                e
            ),
        }
    }
    loaded
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::path::PathBuf;

    use hermes_context::ReferenceTable;
    use hermes_core::Event;

    use super::*;

    fn empty_context() -> Context {
        Context::from_tables(
            ReferenceTable::default(),
            ReferenceTable::default(),
            ReferenceTable::default(),
            ReferenceTable::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_bad_extensions_are_skipped() {
        let _ = env_logger::try_init();
        let mut dispatcher = Dispatcher::new(VecDeque::<Event>::new(), empty_context());

        let mut missing = StrategyConfig::new("missing");
        missing.libpath = Some(PathBuf::from("/nonexistent/libnothing.so"));
        let mut disabled = StrategyConfig::new("disabled");
        disabled.enabled = false;
        let no_path = StrategyConfig::new("no_path");

        let loaded = load_extensions(&mut dispatcher, &[missing, disabled, no_path]);
        assert_eq!(loaded, 0);
        assert!(dispatcher.extensions().is_empty());
    }

    #[test]
    fn test_missing_data_folder_is_fatal() {
        let config = RuntimeConfig::from_str(
            r#"{ "data_folder": "/nonexistent/hermes", "channel": { "name": "md" } }"#,
        )
        .unwrap();
        assert!(matches!(bootstrap(&config), Err(RunnerError::Context(_))));
    }
}
