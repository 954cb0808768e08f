// Sinusoid Runner - Command-line host for the sinusoid plugin
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Sinusoid Runner
//!
//! Drives the sinusoid plugin the way an ingestion host would and prints
//! every reading as a JSON line on stdout. Logs go to stderr.
//!
//! ## Usage
//!
//! ```bash
//! # Push mode, 5 readings per second, until Ctrl-C
//! sinusoid-runner --rate 5
//!
//! # Poll mode, 120 readings, custom asset
//! sinusoid-runner --mode poll --asset-name wave --count 120
//!
//! # Print plugin metadata
//! sinusoid-runner --describe
//! ```

mod config;
mod error;
mod output;

use clap::{Parser, ValueEnum};
use config::build_configuration;
use error::Result;
use output::JsonLinesSink;
use sinusoid::{
    AsyncSinusoid, Configuration, MemorySink, PluginInfo, PollSinusoid, SinusoidError, SouthPlugin,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

/// Operating mode to run the plugin in
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Background task pushes readings
    Async,
    /// Runner polls at the configured rate
    Poll,
}

/// Sinusoid south plugin runner
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Operating mode
    #[arg(short, long, value_enum, default_value = "async")]
    mode: Mode,

    /// Asset name for the readings
    #[arg(short, long)]
    asset_name: Option<String>,

    /// Data points per second
    #[arg(short, long)]
    rate: Option<String>,

    /// JSON configuration category to load
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after this many readings
    #[arg(short = 'n', long)]
    count: Option<u64>,

    /// Print plugin metadata as JSON and exit
    #[arg(long)]
    describe: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match args.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };
        EnvFilter::from_default_env().add_directive(level.into())
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    if args.describe {
        println!("{}", serde_json::to_string_pretty(&describe(args.mode))?);
        return Ok(());
    }

    let config = build_configuration(
        args.config.as_deref(),
        args.asset_name.as_deref(),
        args.rate.as_deref(),
    )?;

    info!(
        "Sinusoid runner v{} ({:?} mode, asset {})",
        env!("CARGO_PKG_VERSION"),
        args.mode,
        config.asset_name()
    );

    match args.mode {
        Mode::Async => run_push(&config, args.count).await,
        Mode::Poll => run_poll(&config, args.count).await,
    }
}

/// Plugin metadata for `mode`, taken from the plugin itself
fn describe(mode: Mode) -> PluginInfo {
    match mode {
        Mode::Async => AsyncSinusoid::new(Arc::new(MemorySink::new())).describe(),
        Mode::Poll => PollSinusoid::new().describe(),
    }
}

/// Start the push task and wait for Ctrl-C, the reading limit, or a
/// task failure.
async fn run_push(config: &Configuration, count: Option<u64>) -> Result<()> {
    let sink = Arc::new(JsonLinesSink::new(std::io::stdout(), count));
    let plugin = AsyncSinusoid::new(Arc::clone(&sink));
    let mut handle = plugin.initialize(config);
    plugin.start(&mut handle)?;

    let outcome = tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupt received, shutting down");
            Ok(())
        }
        _ = sink.finished() => Ok(()),
        outcome = handle.wait() => outcome.unwrap_or(Ok(())),
    };

    plugin.shutdown(&mut handle);
    info!("{} readings written", sink.written());
    outcome?;
    Ok(())
}

/// Poll on a fixed interval until Ctrl-C or the reading limit.
async fn run_poll(config: &Configuration, count: Option<u64>) -> Result<()> {
    let sink = JsonLinesSink::new(std::io::stdout(), count);
    let plugin = PollSinusoid::new();
    let mut handle = plugin.initialize(config);
    let mut ticker = tokio::time::interval(handle.poll_interval());

    let outcome: Result<()> = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupt received, shutting down");
                break Ok(());
            }
            _ = ticker.tick() => {
                let reading = match plugin.poll(&handle) {
                    Ok(reading) => reading,
                    Err(e) => break Err(e.into()),
                };
                if let Err(e) = sink.write_reading(&reading) {
                    break Err(SinusoidError::data_retrieval(reading.asset, e).into());
                }
                if sink.is_finished() {
                    break Ok(());
                }
            }
        }
    };

    plugin.shutdown(&mut handle);
    info!("{} readings written", sink.written());
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use sinusoid::PluginMode;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["sinusoid-runner"]);
        assert_eq!(args.mode, Mode::Async);
        assert!(args.count.is_none());
        assert!(!args.describe);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_args_poll_mode() {
        let args = Args::parse_from([
            "sinusoid-runner",
            "--mode",
            "poll",
            "--asset-name",
            "wave",
            "--rate",
            "5",
            "-n",
            "10",
        ]);
        assert_eq!(args.mode, Mode::Poll);
        assert_eq!(args.asset_name.as_deref(), Some("wave"));
        assert_eq!(args.rate.as_deref(), Some("5"));
        assert_eq!(args.count, Some(10));
    }

    #[test]
    fn test_describe_per_mode() {
        let info = describe(Mode::Async);
        assert_eq!(info.name, "Sinusoid plugin");
        assert_eq!(info.mode, PluginMode::Async);

        let info = describe(Mode::Poll);
        assert_eq!(info.mode, PluginMode::Poll);
        assert_eq!(info.config, Configuration::default_schema());
    }

    #[tokio::test(start_paused = true)]
    async fn test_push_stops_at_limit() {
        let sink = Arc::new(JsonLinesSink::new(Vec::new(), Some(3)));
        let plugin = AsyncSinusoid::new(Arc::clone(&sink));
        let mut handle = plugin.initialize(&Configuration::default_schema());
        plugin.start(&mut handle).unwrap();

        sink.finished().await;
        plugin.shutdown(&mut handle);
        assert_eq!(sink.written(), 3);
    }
}
