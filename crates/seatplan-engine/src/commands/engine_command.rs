//! Engine-level commands: one entry point for seating and record management

use std::time::Instant;

use seatplan_core::errors::Result;
use seatplan_core::model::{Guest, GuestFilter, GuestId, OccupiedTable, Seating, Table, TableId};
use seatplan_core::ops::{guest_ops, table_ops};
use seatplan_core::repository::SeatingStore;
use seatplan_core::{log_op_end, log_op_error, log_op_start};

use crate::commands::seating::SeatingEngine;

/// Commands the request layer can issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    /// Seat a guest with `party_size` companions.
    AssignSeat { guest_id: GuestId, party_size: u32 },
    OccupiedSeats,
    FreeSeatCount,

    CreateGuest { name: String, party_size: u32 },
    ReadGuest { guest_id: GuestId },
    /// Only the provided fields change.
    UpdateGuest {
        guest_id: GuestId,
        name: Option<String>,
        party_size: Option<u32>,
    },
    DeleteGuest { guest_id: GuestId },
    ListGuests { filter: GuestFilter },

    CreateTable { capacity: u32 },
    ReadTable { table_id: TableId },
    ResizeTable { table_id: TableId, capacity: u32 },
    DeleteTable { table_id: TableId },
    ListTables,
}

impl EngineCommand {
    /// Operation name used in logs
    pub fn op_name(&self) -> &'static str {
        match self {
            EngineCommand::AssignSeat { .. } => "assign_seat",
            EngineCommand::OccupiedSeats => "occupied_seats",
            EngineCommand::FreeSeatCount => "free_seat_count",
            EngineCommand::CreateGuest { .. } => "guest_create",
            EngineCommand::ReadGuest { .. } => "guest_read",
            EngineCommand::UpdateGuest { .. } => "guest_update",
            EngineCommand::DeleteGuest { .. } => "guest_delete",
            EngineCommand::ListGuests { .. } => "guest_list",
            EngineCommand::CreateTable { .. } => "table_create",
            EngineCommand::ReadTable { .. } => "table_read",
            EngineCommand::ResizeTable { .. } => "table_resize",
            EngineCommand::DeleteTable { .. } => "table_delete",
            EngineCommand::ListTables => "table_list",
        }
    }
}

/// Result of applying an engine command.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommandResult {
    Seated(Seating),
    OccupiedSeats(Vec<OccupiedTable>),
    FreeSeatCount(u64),
    Guest(Guest),
    Guests(Vec<Guest>),
    Table(Table),
    Tables(Vec<Table>),
    GuestDeleted(GuestId),
    TableDeleted(TableId),
}

/// Apply an engine command.
///
/// Seating commands go through the engine, which logs its own boundary;
/// record-management commands are logged here.
///
/// # Errors
///
/// Whatever the underlying operation returns; see `SeatingEngine` and
/// `seatplan_core::ops`.
pub fn apply_engine_command<S: SeatingStore>(
    cmd: EngineCommand,
    engine: &SeatingEngine<S>,
) -> Result<EngineCommandResult> {
    let op = cmd.op_name();
    let store = engine.store();

    match cmd {
        EngineCommand::AssignSeat {
            guest_id,
            party_size,
        } => engine
            .assign_seat(guest_id, party_size)
            .map(EngineCommandResult::Seated),
        EngineCommand::OccupiedSeats => engine
            .occupied_seats()
            .map(EngineCommandResult::OccupiedSeats),
        EngineCommand::FreeSeatCount => engine
            .free_seat_count()
            .map(EngineCommandResult::FreeSeatCount),

        EngineCommand::CreateGuest { name, party_size } => {
            logged(op, || guest_ops::create_guest(store, name, party_size))
                .map(EngineCommandResult::Guest)
        }
        EngineCommand::ReadGuest { guest_id } => {
            logged(op, || guest_ops::read_guest(store, guest_id)).map(EngineCommandResult::Guest)
        }
        EngineCommand::UpdateGuest {
            guest_id,
            name,
            party_size,
        } => logged(op, || {
            guest_ops::update_guest(store, guest_id, name, party_size)
        })
        .map(EngineCommandResult::Guest),
        EngineCommand::DeleteGuest { guest_id } => {
            logged(op, || guest_ops::delete_guest(store, guest_id))
                .map(|()| EngineCommandResult::GuestDeleted(guest_id))
        }
        EngineCommand::ListGuests { filter } => {
            logged(op, || guest_ops::list_guests(store, filter)).map(EngineCommandResult::Guests)
        }

        EngineCommand::CreateTable { capacity } => {
            logged(op, || table_ops::create_table(store, capacity)).map(EngineCommandResult::Table)
        }
        EngineCommand::ReadTable { table_id } => {
            logged(op, || table_ops::read_table(store, table_id)).map(EngineCommandResult::Table)
        }
        EngineCommand::ResizeTable { table_id, capacity } => logged(op, || {
            table_ops::update_table_capacity(store, table_id, capacity)
        })
        .map(EngineCommandResult::Table),
        EngineCommand::DeleteTable { table_id } => {
            logged(op, || table_ops::delete_table(store, table_id))
                .map(|()| EngineCommandResult::TableDeleted(table_id))
        }
        EngineCommand::ListTables => {
            logged(op, || table_ops::list_tables(store)).map(EngineCommandResult::Tables)
        }
    }
}

fn logged<T>(op: &'static str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    log_op_start!(op);
    let start = Instant::now();

    let value = f().map_err(|e| {
        log_op_error!(op, e, duration_ms = start.elapsed().as_millis() as u64);
        e
    })?;

    log_op_end!(op, duration_ms = start.elapsed().as_millis() as u64);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatplan_core::{MemoryStore, SeatingError};

    #[test]
    fn test_dispatch_record_then_seating_commands() {
        let engine = SeatingEngine::new(MemoryStore::new());

        let table = apply_engine_command(EngineCommand::CreateTable { capacity: 4 }, &engine);
        assert!(matches!(table, Ok(EngineCommandResult::Table(ref t)) if t.capacity == 4));

        let guest = apply_engine_command(
            EngineCommand::CreateGuest {
                name: "Ada".to_string(),
                party_size: 0,
            },
            &engine,
        );
        assert!(matches!(guest, Ok(EngineCommandResult::Guest(ref g)) if g.id == 1));

        let seated = apply_engine_command(
            EngineCommand::AssignSeat {
                guest_id: 1,
                party_size: 3,
            },
            &engine,
        );
        assert_eq!(
            seated,
            Ok(EngineCommandResult::Seated(Seating {
                guest_id: 1,
                table_id: 1
            }))
        );
        assert_eq!(
            apply_engine_command(EngineCommand::FreeSeatCount, &engine),
            Ok(EngineCommandResult::FreeSeatCount(0))
        );
    }

    #[test]
    fn test_dispatch_surfaces_errors() {
        let engine = SeatingEngine::new(MemoryStore::new());
        assert_eq!(
            apply_engine_command(EngineCommand::ReadTable { table_id: 3 }, &engine),
            Err(SeatingError::TableNotFound { table_id: 3 })
        );
    }

    #[test]
    fn test_op_names_are_unique() {
        let cmds = [
            EngineCommand::AssignSeat {
                guest_id: 1,
                party_size: 0,
            },
            EngineCommand::OccupiedSeats,
            EngineCommand::FreeSeatCount,
            EngineCommand::CreateGuest {
                name: String::new(),
                party_size: 0,
            },
            EngineCommand::ReadGuest { guest_id: 1 },
            EngineCommand::UpdateGuest {
                guest_id: 1,
                name: None,
                party_size: None,
            },
            EngineCommand::DeleteGuest { guest_id: 1 },
            EngineCommand::ListGuests {
                filter: GuestFilter::all(),
            },
            EngineCommand::CreateTable { capacity: 1 },
            EngineCommand::ReadTable { table_id: 1 },
            EngineCommand::ResizeTable {
                table_id: 1,
                capacity: 1,
            },
            EngineCommand::DeleteTable { table_id: 1 },
            EngineCommand::ListTables,
        ];
        let names: std::collections::HashSet<_> = cmds.iter().map(|c| c.op_name()).collect();
        assert_eq!(names.len(), cmds.len());
    }
}
