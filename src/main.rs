//! Server Recap - Binary Entry Point
//!
//! Reads gateway notifications as JSON lines (stdin or `--input`) and
//! writes the per-guild activity logs.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use parking_lot::Mutex;
use tracing::{error, info, warn};

use server_recap::config::{confirm_production, BotConfig, Mode};
use server_recap::logging::init_logging;
use server_recap::storage::{GuildLogStore, StatsCollector, StorageStats};
use server_recap::{run_shared_feed, EventRouter};

#[derive(Parser)]
#[command(name = "recap-bot")]
#[command(about = "Voice activity and guild event logger")]
#[command(version)]
struct Args {
    /// Environment to run in (defaults to dev)
    #[arg(short, long, value_enum, env = "RECAP_MODE")]
    mode: Option<Mode>,

    /// Override the mode's data root
    #[arg(long)]
    data_root: Option<PathBuf>,

    /// Directory for run log files
    #[arg(long, default_value = "logs")]
    logs_dir: PathBuf,

    /// Read notifications from this file instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Skip the production confirmation
    #[arg(short, long)]
    yes: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mode = args.mode.unwrap_or_default();

    let log_file = init_logging(mode, &args.logs_dir)?;
    if args.mode.is_none() {
        warn!("No mode given, defaulting to {}", mode);
    }
    info!("Starting {} v{} in {} mode", server_recap::NAME, server_recap::VERSION, mode);
    info!("Logging to {}", log_file.display());

    if mode == Mode::Prod && !args.yes {
        let confirmed = confirm_production(io::stdin().lock(), io::stdout())
            .context("reading production confirmation")?;
        if !confirmed {
            info!("Production run declined");
            process::exit(0);
        }
    }

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            warn!("Could not load .env: {}", e);
        }
    }

    let config = BotConfig::resolve(mode, args.data_root);
    if config.token.is_none() {
        warn!("{} is not set; the gateway connection will not authenticate", mode.token_var());
    }
    info!("Data root: {}", config.storage.data_root().display());

    let stats = StatsCollector::new(config.storage.clone())
        .collect()
        .context("scanning existing guild logs")?;
    log_storage_stats(&stats);

    let store = Arc::new(GuildLogStore::new(config.storage));
    let router = Arc::new(Mutex::new(EventRouter::new(store)));

    // Holding the router lock lets an in-flight dispatch finish first
    let handler_router = Arc::clone(&router);
    ctrlc::set_handler(move || {
        let router = handler_router.lock();
        info!("Interrupted, shutting down");
        router.log_summary();
        process::exit(0);
    })
    .context("installing signal handler")?;

    let report = match &args.input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening feed {}", path.display()))?;
            run_shared_feed(&router, BufReader::new(file))
        }
        None => run_shared_feed(&router, io::stdin().lock()),
    };

    match report {
        Ok(_) => {
            info!("Shutdown complete");
            Ok(())
        }
        Err(e) => {
            error!("Feed stopped: {}", e);
            Err(e.into())
        }
    }
}

fn log_storage_stats(stats: &StorageStats) {
    for guild in &stats.guilds {
        info!(
            "Guild {}: {} events, {} sessions, {} journal entries, {}",
            guild.guild_id,
            guild.event_rows,
            guild.session_rows,
            guild.journal_entries,
            StorageStats::format_size(guild.total_bytes)
        );
    }
    info!(
        "{} guilds on disk, {} total",
        stats.guilds.len(),
        StorageStats::format_size(stats.total_bytes())
    );
}
