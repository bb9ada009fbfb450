//! Table record commands
//!
//! Usage: seatplan table <add|get|list|resize|delete>

use clap::{Args, Subcommand};
use seatplan_core::{SeatingStore, TableId};
use seatplan_engine::{EngineCommand, SeatingEngine};

#[derive(Debug, Args)]
pub struct TableArgs {
    #[command(subcommand)]
    pub command: TableCommand,
}

#[derive(Debug, Subcommand)]
pub enum TableCommand {
    /// Add a table
    Add {
        #[arg(long)]
        capacity: u32,
    },
    /// Show one table
    Get { id: TableId },
    /// List all tables
    List,
    /// Change a table's seat count
    Resize {
        id: TableId,
        #[arg(long)]
        capacity: u32,
    },
    /// Remove a free table
    Delete { id: TableId },
}

/// Execute table command
pub fn execute<S: SeatingStore>(args: TableArgs, engine: &SeatingEngine<S>) -> anyhow::Result<()> {
    let cmd = match args.command {
        TableCommand::Add { capacity } => EngineCommand::CreateTable { capacity },
        TableCommand::Get { id } => EngineCommand::ReadTable { table_id: id },
        TableCommand::List => EngineCommand::ListTables,
        TableCommand::Resize { id, capacity } => EngineCommand::ResizeTable {
            table_id: id,
            capacity,
        },
        TableCommand::Delete { id } => EngineCommand::DeleteTable { table_id: id },
    };
    super::run(cmd, engine)
}
