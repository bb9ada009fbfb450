//! Subcommand handlers
//!
//! Each handler builds an `EngineCommand`, applies it, and prints the
//! result as pretty JSON on stdout.

pub mod guest;
pub mod seating;
pub mod table;

use std::error::Error as _;

use anyhow::anyhow;
use seatplan_core::{SeatingError, SeatingStore};
use seatplan_engine::{apply_engine_command, EngineCommand, EngineCommandResult, SeatingEngine};
use serde_json::json;

/// Apply a command and print its result
pub fn run<S: SeatingStore>(cmd: EngineCommand, engine: &SeatingEngine<S>) -> anyhow::Result<()> {
    let result = apply_engine_command(cmd, engine).map_err(describe)?;
    print_result(&result)
}

/// Error text carries the stable code; store causes go to the log only
fn describe(err: SeatingError) -> anyhow::Error {
    if !err.is_business_rule() {
        if let Some(cause) = err.source() {
            tracing::error!(cause = %cause, "store failure");
        }
    }
    anyhow!("[{}] {}", err.code(), err)
}

fn print_result(result: &EngineCommandResult) -> anyhow::Result<()> {
    let value = match result {
        EngineCommandResult::Seated(seating) => serde_json::to_value(seating)?,
        EngineCommandResult::OccupiedSeats(tables) => serde_json::to_value(tables)?,
        EngineCommandResult::FreeSeatCount(count) => json!({ "free_seats": count }),
        EngineCommandResult::Guest(guest) => serde_json::to_value(guest)?,
        EngineCommandResult::Guests(guests) => serde_json::to_value(guests)?,
        EngineCommandResult::Table(table) => serde_json::to_value(table)?,
        EngineCommandResult::Tables(tables) => serde_json::to_value(tables)?,
        EngineCommandResult::GuestDeleted(id) => json!({ "deleted_guest": id }),
        EngineCommandResult::TableDeleted(id) => json!({ "deleted_table": id }),
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
