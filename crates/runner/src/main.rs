use std::sync::atomic::Ordering;

use hermes_runner::{RuntimeConfig, bootstrap};

fn print_help() {
    eprintln!(
        r#"Hermes Runner - event dispatcher for loaded strategy extensions

USAGE:
    hermes-runner --config <PATH>

OPTIONS:
    --config <PATH>     Load runtime configuration from JSON file
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter (default: info)

EXAMPLES:
    # Attach to the channel named in the config and run until Ctrl-C
    hermes-runner --config hermes.json

    # Trace every skipped order intent
    RUST_LOG=debug,hermes_runner::dispatcher=trace hermes-runner -c hermes.json
"#
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let Some(path) = config_path else {
        eprintln!("Error: --config is required");
        print_help();
        std::process::exit(1);
    };

    log::info!("Loading configuration from: {}", path);
    let config = RuntimeConfig::from_file(&path)?;
    log::info!("Channel: {}", config.channel.path().display());
    log::info!("Strategies: {}", config.enabled_strategies().count());

    let mut dispatcher = match bootstrap(&config) {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            log::error!("Startup failed: {}", e);
            return Err(e.into());
        }
    };

    let shutdown = dispatcher.shutdown_handle();
    let signal = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Shutdown requested, finishing in-flight event");
            shutdown.store(true, Ordering::Release);
        }
    });

    let stats = tokio::task::spawn_blocking(move || dispatcher.run()).await?;
    signal.abort();

    log::info!(
        "Processed {} events: {} callbacks, {} rejected, {} order intents, {} idle polls",
        stats.events,
        stats.dispatched_callbacks,
        stats.rejected,
        stats.order_intents,
        stats.idle_polls
    );
    Ok(())
}
