//! SeatPlan CLI
//!
//! Command-line request layer for the seating engine

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use seatplan_core::logging_facility;
use seatplan_core_types::RequestId;
use seatplan_engine::SeatingEngine;
use seatplan_store::SqliteStore;

mod commands;
mod settings;

use settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "seatplan")]
#[command(about = "SeatPlan - event guest and table seating", long_about = None)]
struct Cli {
    /// Configuration file (TOML); defaults to ./seatplan.toml if present
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Database file; overrides database.path
    #[arg(long, global = true, value_name = "FILE")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Guest records
    Guest(commands::guest::GuestArgs),
    /// Table records
    Table(commands::table::TableArgs),
    /// Seat an arriving guest and their companions
    Seat(commands::seating::SeatArgs),
    /// List occupied tables with their guests
    Occupied,
    /// Total seats across free tables
    FreeSeats,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // a missing .env is fine
    let _ = dotenvy::dotenv();

    let settings = Settings::load(cli.config.as_deref(), cli.db.as_deref())?;
    logging_facility::init(settings.log_profile()?);

    let request_id = RequestId::new();
    let span = tracing::info_span!("request", request_id = %request_id);
    let _guard = span.enter();

    let db_path = &settings.database.path;
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let store = SqliteStore::open(db_path, settings.busy_timeout())
        .with_context(|| format!("failed to open database {}", db_path.display()))?;
    let engine = SeatingEngine::new(store);

    match cli.command {
        Commands::Guest(args) => commands::guest::execute(args, &engine),
        Commands::Table(args) => commands::table::execute(args, &engine),
        Commands::Seat(args) => commands::seating::execute_seat(args, &engine),
        Commands::Occupied => commands::seating::execute_occupied(&engine),
        Commands::FreeSeats => commands::seating::execute_free_seats(&engine),
    }
}
