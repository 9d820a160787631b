//! ArtGuard - museum security demo dashboard (console)
//!
//! Runs the full session core headless: per-camera motion simulation,
//! dwell detection, the alert pipeline, and the command interpreter,
//! with a line-based command prompt on stdin.
//!
//! Module structure:
//! - `domain/` - Core types (Camera, Alert, FloorMap, Detection)
//! - `io/` - External collaborators (Directory, Speech)
//! - `services/` - Business logic (Simulator, Interpreter, Session)
//! - `infra/` - Infrastructure (Config, Metrics)

use artguard::infra::{Config, Metrics};
use artguard::io::{Directory, LogSpeech, Speech};
use artguard::services::session::{epoch_ms, SessionController};
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// ArtGuard - museum security demo dashboard
#[derive(Parser, Debug)]
#[command(name = "artguard", version, about)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "config/dev.toml")]
    config: String,

    /// Start a scripted demo scenario (1: patrol, 2: suspicious, 3: heist)
    #[arg(long)]
    scenario: Option<u32>,

    /// Disable the simulated speech output
    #[arg(long)]
    mute: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured logging with configurable level via RUST_LOG env var
    // Default: INFO, use RUST_LOG=debug for full event visibility
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();

    info!(git_hash = %env!("GIT_HASH"), "artguard starting");

    let args = Args::parse();
    let config = Config::load_from_path(&args.config);
    let directory = Directory::load(config.directory_file());

    info!(
        config_file = %config.config_file(),
        site = %config.site_name(),
        cameras = %directory.cameras.len(),
        guards = %directory.guards.len(),
        dwell_ms = %config.dwell_ms(),
        cooldown_ms = %config.cooldown_ms(),
        frame_interval_ms = %config.frame_interval_ms(),
        "config_loaded"
    );

    // Create shutdown signal
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let metrics = Arc::new(Metrics::new());
    let speech =
        if args.mute { Speech::disabled() } else { Speech::new(Arc::new(LogSpeech)) };

    // Start metrics reporter
    let metrics_clone = metrics.clone();
    let metrics_interval = config.metrics_interval_secs();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(metrics_interval));
        loop {
            interval.tick().await;
            metrics_clone.report(metrics_interval).log();
        }
    });

    // Transcript mirror: print assistant responses to the console
    let (response_tx, mut response_rx) = mpsc::unbounded_channel::<artguard::domain::ChatMessage>();
    tokio::spawn(async move {
        while let Some(message) = response_rx.recv().await {
            println!("[{}] {}", message.role.as_str(), message.content);
        }
    });

    // Command channel fed from stdin
    let (command_tx, command_rx) = mpsc::channel::<String>(16);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if command_tx.send(line).await.is_err() {
                break;
            }
        }
    });

    // Handle shutdown on Ctrl+C
    let shutdown_signal = shutdown_tx;
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("shutdown_signal_received");
        let _ = shutdown_signal.send(true);
    });

    let mut session = SessionController::new(config, directory, metrics, speech)
        .with_response_channel(response_tx);
    session.push_message(
        artguard::domain::ChatRole::Assistant,
        "System online. Say 'status report' or try 'help' to see commands.",
        epoch_ms(),
    );
    if let Some(id) = args.scenario {
        session.run_scenario(id, epoch_ms());
    }
    info!("session_started");

    session.run(command_rx, shutdown_rx).await;

    info!("artguard shutdown complete");
    Ok(())
}
