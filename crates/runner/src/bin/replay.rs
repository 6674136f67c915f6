use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use hermes_channel::{ChannelWriter, EventPublisher};
use hermes_context::Context;
use hermes_runner::{ReplayFeed, RuntimeConfig, load_bar_file};

fn print_help() {
    eprintln!(
        r#"Hermes Replay - publish historical bar files into a channel

USAGE:
    hermes-replay --config <PATH> [--bars <FILE>]...

OPTIONS:
    --config <PATH>     Load runtime configuration from JSON file
    --bars <FILE>       Add a bar file (repeatable, appended to replay.bar_files)
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter (default: info)

EXAMPLES:
    # Replay the files listed in the config
    hermes-replay --config hermes.json

    # Replay an extra file
    hermes-replay -c hermes.json --bars data/rb2405_1m.csv
"#
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut extra_files: Vec<String> = Vec::new();

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
            "--bars" | "-b" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --bars requires a file argument");
                    std::process::exit(1);
                }
                extra_files.push(args[i].clone());
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

    let mut config = RuntimeConfig::from_file(&path)?;
    config
        .replay
        .bar_files
        .extend(extra_files.into_iter().map(Into::into));
    if config.replay.bar_files.is_empty() {
        eprintln!("Error: no bar files to replay");
        std::process::exit(1);
    }

    let context = Context::init(&config.data_folder)?;
    let mut feed = ReplayFeed::new();
    for file in &config.replay.bar_files {
        feed.add_source(load_bar_file(file, &context)?);
    }
    log::info!(
        "Replaying {} events from {} files",
        feed.len(),
        feed.source_count()
    );

    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    let signal = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Stop requested");
            flag.store(true, Ordering::Release);
        }
    });

    let channel = config.channel.clone();
    let policy = config.replay.policy;
    let linger = Duration::from_millis(config.replay.linger_ms);
    let stats = tokio::task::spawn_blocking(move || -> Result<_, hermes_channel::SegmentError> {
        let writer = ChannelWriter::open(&channel)?;
        let mut publisher = EventPublisher::new(writer, channel.name.clone(), policy);
        for event in feed {
            if stop.load(Ordering::Acquire) {
                break;
            }
            // Drops are counted by the publisher and logged there
            let _ = publisher.publish(&event);
        }

        // The creating writer unlinks the segment on drop; give the reader
        // time to drain first
        let deadline = Instant::now() + linger;
        while !publisher.sink().is_empty() && Instant::now() < deadline {
            if stop.load(Ordering::Acquire) {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        Ok(publisher.stats())
    })
    .await??;
    signal.abort();

    log::info!(
        "Published {} events, dropped {}, {} retries",
        stats.accepted,
        stats.dropped,
        stats.retries
    );
    Ok(())
}
