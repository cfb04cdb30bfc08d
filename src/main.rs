//! Welcomer - join greeter for multiplayer chat
//!
//! Main entry point for the line-oriented front end.
//!
//! # Overview
//!
//! The binary stands in for a game client's chat hooks. It initializes:
//! - Logging infrastructure (file rotation + optional console output)
//! - Tokio async runtime (delayed self-greet tasks, outbound printer)
//! - State management ([`StateManager`])
//! - Configuration loading ([`ConfigManager`])
//! - The greeting engine, self-greet scheduler and command controller
//!
//! # Input
//!
//! Each stdin line is one event:
//! - `/connected`: the local user joined; arms the self-greet
//! - `/disconnected`: clears the local user
//! - `/welcomer ...`: a command; feedback goes to stderr
//! - anything else: offered to the join parser (`<name> joined the game`)
//!
//! Outbound chat lines are written to stdout.

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::BufReader;
use tokio::sync::broadcast::error::RecvError;
use welcomer::input::{InputLine, LineReader};
use welcomer::services::{
    ChannelSink, CooldownPolicy, IgnoreRegistry, MessageBank, PoolKind, SelfGreetTiming,
};
use welcomer::{
    APP_NAME, CommandController, ConfigManager, GreetingEngine, JoinEventParser, MessageSink,
    Metrics, SelfGreetScheduler, StateManager, VERSION, WelcomerSettings,
};

#[derive(Parser, Debug)]
#[command(name = "welcomer", version, about = "Greets players as they join")]
struct Args {
    /// Directory holding the message, ignore and settings files
    #[arg(long, default_value = "config")]
    config_dir: Utf8PathBuf,

    /// Directory for rolling log files
    #[arg(long, default_value = "logs")]
    log_dir: Utf8PathBuf,

    /// Local player name, applied on `/connected`
    #[arg(long)]
    player: Option<String>,

    /// Debug-level logging regardless of the settings file
    #[arg(long)]
    debug: bool,

    /// Log to the file only
    #[arg(long)]
    quiet_console: bool,

    /// Write the file log as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_manager = ConfigManager::new(&args.config_dir)?;
    let seeded = config_manager.ensure_settings_file();
    let settings = config_manager.read_settings()?.settings;

    let _guard = welcomer::logging::setup_logging_with_console(
        &args.log_dir,
        APP_NAME,
        args.debug || settings.debug_mode,
        !args.quiet_console,
        args.json_logs,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);
    match seeded {
        Ok(true) => tracing::warn!(
            "Settings file not found, wrote defaults to {}",
            config_manager.settings_path()
        ),
        Ok(false) => {}
        Err(e) => tracing::error!("Failed to write default settings: {:#}", e),
    }
    tracing::info!("Loaded settings from {}", config_manager.settings_path());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("welcomer-worker")
        .build()
        .context("Failed to build tokio runtime")?;

    let result = runtime.block_on(run(args, config_manager, settings));

    runtime.shutdown_timeout(Duration::from_secs(1));
    tracing::info!("Shutdown complete");

    result
}

async fn run(args: Args, config_manager: ConfigManager, settings: WelcomerSettings) -> Result<()> {
    let state = StateManager::from_settings(&settings);
    let metrics = Arc::new(Metrics::new());

    let (sink, mut outbound) = ChannelSink::new();
    let sink: Arc<dyn MessageSink> = Arc::new(sink);

    let engine = Arc::new(GreetingEngine::new(
        state.clone(),
        MessageBank::load(config_manager.messages_path(), PoolKind::Welcome),
        IgnoreRegistry::load(config_manager.ignore_path()),
        CooldownPolicy::new(),
        Arc::clone(&sink),
        Arc::clone(&metrics),
    ));

    let self_greeter = Arc::new(SelfGreetScheduler::new(
        state.clone(),
        MessageBank::load(config_manager.self_messages_path(), PoolKind::SelfGreet),
        SelfGreetTiming::from_settings(&settings),
        sink,
        Arc::clone(&metrics),
    ));

    let controller = CommandController::new(
        state.clone(),
        Arc::clone(&engine),
        Arc::clone(&self_greeter),
        settings.clone(),
    );

    tracing::info!("{}", state.read(|s| s.status_line()));

    // Outbound chat
    tokio::spawn(async move {
        while let Some(message) = outbound.recv().await {
            println!("{}", message);
        }
    });

    spawn_state_logger(&state);

    if let Some(interval) = settings.clock_prune_interval() {
        spawn_pruner(Arc::clone(&engine), interval, settings.longest_per_player());
    }

    let parser = JoinEventParser::new();
    let mut lines = LineReader::new(BufReader::new(tokio::io::stdin()));

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read stdin")?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                None
            }
        };

        let Some(line) = line else {
            break;
        };

        match InputLine::classify(&line) {
            InputLine::Connected => match &args.player {
                Some(player) => {
                    state.set_local_player(Some(player.clone()));
                    self_greeter.on_local_join();
                }
                None => tracing::warn!("Connected without --player, self-greet unavailable"),
            },
            InputLine::Disconnected => {
                state.set_local_player(None);
            }
            InputLine::Command(command) => {
                for feedback in controller.handle_line(command) {
                    eprintln!("[Welcomer] {}", feedback);
                }
            }
            InputLine::Chat(chat) => {
                if let Ok(player) = parser.parse(chat) {
                    engine.handle_join(&player);
                }
            }
        }
    }

    metrics.log_summary();
    Ok(())
}

/// Log every state change at debug level
fn spawn_state_logger(state: &StateManager) {
    let mut rx = state.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(change) => tracing::debug!("State change: {:?}", change),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("State listener lagged, skipped {} events", skipped)
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

/// Periodically drop cooldown entries too old to deny anything
fn spawn_pruner(engine: Arc<GreetingEngine>, interval: Duration, horizon: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let pruned = engine.policy().prune_stale(Instant::now(), horizon);
            engine.metrics().record_pruned(pruned);
        }
    });
}
