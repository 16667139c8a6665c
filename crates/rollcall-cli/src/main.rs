//! Attendance terminal.
//!
//! Runs the capture loop as a bench terminal: credentials arrive as hex lines
//! on stdin and the feedback lines are reported through the log.
//!
//! ```text
//! $ echo 04ABCDEF | rollcall --once
//! ```

use anyhow::Context;
use clap::Parser;
use rollcall_core::{SystemClock, TerminalConfig, WallClock};
use rollcall_hardware::console::{ConsoleIndicator, ConsoleRfid};
use rollcall_hardware::devices::{AnyRfidDevice, AnySignalOutput};
use rollcall_hardware::{FeedbackIndicator, ReaderAdapter};
use rollcall_network::{AttendanceRecorder, ClientConfig, DirectoryResolver};
use rollcall_terminal::CaptureLoop;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rollcall")]
#[command(about = "RFID attendance terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ROLLCALL_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "ROLLCALL_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "ROLLCALL_LOG_JSON")]
    json: bool,

    /// Process a single credential, then exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let config =
        TerminalConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    info!(version = rollcall_core::VERSION, "Starting attendance terminal");
    info!(ssid = %config.network.ssid, "Network");
    info!(
        ntp_server = %config.clock.ntp_server,
        offset_secs = config.clock.total_offset_secs(),
        "Time source"
    );
    info!(base_url = config.server.base_url(), "Directory and ledger service");

    let clock = SystemClock::new(&config.clock)?;
    match clock.now() {
        Some(now) => info!(%now, "Clock synchronized"),
        None => warn!("Clock not synchronized, events will be submitted without date and time"),
    }

    let client = ClientConfig::from(&config.server);
    let http = client.build_client()?;
    let directory = DirectoryResolver::with_client(http.clone(), &client);
    let ledger = AttendanceRecorder::with_client(http, &client, clock);

    let reader = ReaderAdapter::new(AnyRfidDevice::Console(ConsoleRfid::stdin()));
    let mut indicator = FeedbackIndicator::new(
        AnySignalOutput::Console(ConsoleIndicator::new()),
        config.timing.pulse(),
    );
    indicator.reset().await?;

    let reader_info = reader.reader_info().await?;
    info!(reader = %reader_info.name, "Reader ready, present a credential");

    let mut capture = CaptureLoop::new(reader, directory, ledger, indicator, &config.timing);
    let max_cycles = cli.once.then_some(1);

    let interrupted = tokio::select! {
        result = capture.run(max_cycles) => {
            result?;
            false
        }
        _ = tokio::signal::ctrl_c() => true,
    };
    info!(cycles = capture.cycles(), interrupted, "Terminal stopped");

    Ok(())
}

fn init_tracing(cli: &Cli) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_level.clone().into());

    if cli.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["rollcall"]).unwrap();
        assert!(cli.config.is_none());
        assert_eq!(cli.log_level, "info");
        assert!(!cli.json);
        assert!(!cli.once);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "rollcall",
            "--config",
            "terminal.toml",
            "--log-level",
            "debug",
            "--json",
            "--once",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("terminal.toml")));
        assert_eq!(cli.log_level, "debug");
        assert!(cli.json);
        assert!(cli.once);
    }
}
