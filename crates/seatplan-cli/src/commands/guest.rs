//! Guest record commands
//!
//! Usage: seatplan guest <add|get|list|update|delete>

use clap::{Args, Subcommand};
use seatplan_core::{GuestFilter, GuestId, SeatingStore};
use seatplan_engine::{EngineCommand, SeatingEngine};

#[derive(Debug, Args)]
pub struct GuestArgs {
    #[command(subcommand)]
    pub command: GuestCommand,
}

#[derive(Debug, Subcommand)]
pub enum GuestCommand {
    /// Register a guest
    Add {
        #[arg(long)]
        name: String,
        /// Expected number of companions
        #[arg(long, default_value_t = 0)]
        party: u32,
    },
    /// Show one guest
    Get { id: GuestId },
    /// List guests
    List {
        /// Only guests who have arrived
        #[arg(long)]
        arrived: bool,
    },
    /// Change name and/or party size
    Update {
        id: GuestId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        party: Option<u32>,
    },
    /// Remove a guest who is not seated
    Delete { id: GuestId },
}

/// Execute guest command
pub fn execute<S: SeatingStore>(args: GuestArgs, engine: &SeatingEngine<S>) -> anyhow::Result<()> {
    let cmd = match args.command {
        GuestCommand::Add { name, party } => EngineCommand::CreateGuest {
            name,
            party_size: party,
        },
        GuestCommand::Get { id } => EngineCommand::ReadGuest { guest_id: id },
        GuestCommand::List { arrived } => EngineCommand::ListGuests {
            filter: GuestFilter {
                arrived_only: arrived,
            },
        },
        GuestCommand::Update { id, name, party } => EngineCommand::UpdateGuest {
            guest_id: id,
            name,
            party_size: party,
        },
        GuestCommand::Delete { id } => EngineCommand::DeleteGuest { guest_id: id },
    };
    super::run(cmd, engine)
}
