//! Seating commands
//!
//! Usage:
//!   seatplan seat <GUEST_ID> --party <N>
//!   seatplan occupied
//!   seatplan free-seats

use clap::Args;
use seatplan_core::{GuestId, SeatingStore};
use seatplan_engine::{EngineCommand, SeatingEngine};

#[derive(Debug, Args)]
pub struct SeatArgs {
    /// Arriving guest
    pub guest_id: GuestId,

    /// Companions arriving with the guest
    #[arg(long)]
    pub party: u32,
}

pub fn execute_seat<S: SeatingStore>(
    args: SeatArgs,
    engine: &SeatingEngine<S>,
) -> anyhow::Result<()> {
    super::run(
        EngineCommand::AssignSeat {
            guest_id: args.guest_id,
            party_size: args.party,
        },
        engine,
    )
}

pub fn execute_occupied<S: SeatingStore>(engine: &SeatingEngine<S>) -> anyhow::Result<()> {
    super::run(EngineCommand::OccupiedSeats, engine)
}

pub fn execute_free_seats<S: SeatingStore>(engine: &SeatingEngine<S>) -> anyhow::Result<()> {
    super::run(EngineCommand::FreeSeatCount, engine)
}
