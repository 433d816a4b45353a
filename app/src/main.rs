// In app/src/main.rs

use anyhow::{Context, Result};
use app_config::Settings;
use clap::{Parser, Subcommand};
use core_types::Symbol;
use engine::Engine;
use execution::PaperHandler;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracker::PositionTracker;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "A dip-buying intraday equities strategy with a CSV position ledger.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replays a tick file through the configured strategy with paper fills.
    Run {
        /// CSV file with columns ShareCode, LastPrice and optionally TradeDateTime.
        #[arg(short, long)]
        ticks: PathBuf,
    },

    /// Lists the lots currently held in the position ledger.
    Positions {
        /// Only show lots of this symbol.
        #[arg(short, long)]
        symbol: Option<String>,
    },

    /// Prints the effective configuration.
    Config,
}

// --- Main Application Entry Point ---

fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = app_config::load_settings().context("failed to load settings from config/")?;

    // RUST_LOG wins over the configured level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.app.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(environment = %settings.app.environment, "Starting dipbot");

    match cli.command {
        Commands::Run { ticks } => handle_run(&settings, ticks)?,
        Commands::Positions { symbol } => handle_positions(&settings, symbol)?,
        Commands::Config => println!("{}", app_config::to_toml(&settings)?),
    }

    Ok(())
}

fn open_ledger(settings: &Settings) -> Result<PositionTracker> {
    let tracker = &settings.tracker;
    PositionTracker::open(&tracker.log_dir, &tracker.team_name, &tracker.strategy_name)
        .with_context(|| format!("failed to open ledger directory {}", tracker.log_dir.display()))
}

// --- "Run" Subcommand Logic ---

fn handle_run(settings: &Settings, ticks: PathBuf) -> Result<()> {
    // --- 1. Component Instantiation ---
    let ledger = open_ledger(settings)?;
    let handler = PaperHandler::new(ledger);
    let strategy = strategies::factory::create_strategy(&settings.strategy)?;

    // --- 2. Replay ---
    let feed = engine::feed::read_ticks(&ticks)?;
    let mut replay = Engine::new(strategy, handler);
    let summary = replay.run(feed);

    let ledger = replay.handler().ledger();
    tracing::info!(
        ticks = summary.ticks,
        skipped = summary.skipped,
        buys = summary.buys,
        take_profits = summary.take_profits,
        stop_losses = summary.stop_losses,
        open_lots = ledger.positions().count(),
        ledger = %ledger.path().display(),
        "Run complete."
    );
    Ok(())
}

// --- "Positions" Subcommand Logic ---

fn handle_positions(settings: &Settings, symbol: Option<String>) -> Result<()> {
    let ledger = open_ledger(settings)?;
    let filter = symbol.as_deref().map(Symbol::parse).transpose()?;

    println!("{:<4} {:<8} {:>12} {:>8}  {}", "#", "Symbol", "BuyPrice", "Volume", "BuyTime");
    for (index, lot) in ledger.indexed_positions() {
        if filter.as_ref().is_some_and(|s| s != &lot.symbol) {
            continue;
        }
        println!(
            "{:<4} {:<8} {:>12} {:>8}  {}",
            index,
            lot.symbol,
            lot.buy_price.to_string(),
            lot.volume,
            lot.buy_time
        );
    }
    Ok(())
}
