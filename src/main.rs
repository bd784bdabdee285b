//! Private Task Bot - Main Entry Point
//!
//! A single-owner Telegram bot that filters, cleans and processes the
//! owner's messages, with persistent toggles and a failed-task list.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use private_task_bot::commands::CommandHandler;
use private_task_bot::config::BotSettings;
use private_task_bot::logging::init_logging;
use private_task_bot::simulate;
use private_task_bot::store::{JsonFileStore, MemoryStore};
use private_task_bot::telegram::{BotApiClient, MockTransport, PollerMessage, UpdatePoller};

/// Single-owner Telegram task bot.
#[derive(Parser, Debug)]
#[command(name = "private_task_bot")]
#[command(about = "Filter, clean and process your own Telegram messages")]
#[command(version)]
struct Args {
    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Replay a JSON list of simulated updates offline instead of polling.
    #[arg(long, value_name = "EVENTS_JSON")]
    simulate: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load environment variables before anything reads them
    let env_result = dotenvy::from_filename(&args.env_file);

    let settings = BotSettings::from_env().context("Failed to load bot settings")?;

    let _log_guard =
        init_logging(&settings.log_path, &args.log_level).context("Failed to initialize logging")?;

    if let Err(e) = env_result {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    // Re-run now that warnings reach the log
    settings
        .validate()
        .context("Bot settings validation failed")?;

    match args.simulate {
        Some(path) => run_simulation(&settings, &path).await,
        None => run_live(&settings).await,
    }
}

/// Replays recorded updates against the mock transport and in-memory state.
async fn run_simulation(settings: &BotSettings, path: &Path) -> Result<()> {
    let updates = simulate::load_updates(path).context("Failed to load simulated updates")?;
    info!("Replaying {} simulated updates from {}", updates.len(), path.display());

    let handler = CommandHandler::new(MockTransport::new(), MemoryStore::new(), settings);
    simulate::replay(&handler, updates, settings.api_call_interval()).await;

    Ok(())
}

/// Long-polls the Bot API until Ctrl+C.
async fn run_live(settings: &BotSettings) -> Result<()> {
    let token = settings
        .require_token()
        .context("Live polling needs a bot token")?;

    let client = BotApiClient::new(
        token,
        settings.api_call_interval(),
        settings.poll_timeout_secs,
    )
    .context("Failed to create Bot API client")?;

    let store = JsonFileStore::new(
        settings.config_path.clone(),
        settings.failed_tasks_path.clone(),
    );
    info!(
        "Config: {}, failed tasks: {}",
        store.config_path().display(),
        store.failed_tasks_path().display()
    );
    let handler = CommandHandler::new(client, store, settings);

    let (poller_tx, poller_rx) = mpsc::channel::<PollerMessage>(1);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        info!("Received Ctrl+C, shutting down...");
        let _ = poller_tx.send(PollerMessage::Shutdown).await;
    });

    info!("Bot started (owner: {})", settings.owner_id);

    let mut poller = UpdatePoller::new(settings.poll_timeout_secs, settings.max_file_size_bytes());
    poller.run(&handler, poller_rx).await;

    info!("Shutdown complete");
    Ok(())
}
