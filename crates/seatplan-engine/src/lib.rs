//! SeatPlan Engine - seating orchestration
//!
//! Coordinates the seating rules in seatplan-core with any store that
//! implements its capability traits.

pub mod commands;

pub use commands::engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
pub use commands::seating::SeatingEngine;
