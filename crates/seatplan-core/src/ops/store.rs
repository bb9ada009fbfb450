use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::errors::{ExError, ExErrorKind};
use crate::model::{
    seats_required, Guest, GuestFilter, GuestId, GuestUpdate, NewGuest, NewTable, OccupiedTable,
    Table, TableId, TableUpdate,
};
use crate::repository::{
    ClaimOutcome, GuestStore, SeatingClaim, SeatingStore, StoreResult, TableStore, WriteOutcome,
};

#[derive(Debug, Default)]
struct State {
    guests: BTreeMap<GuestId, Guest>,
    tables: BTreeMap<TableId, Table>,
    last_guest_id: GuestId,
    last_table_id: TableId,
}

impl State {
    fn table_for_guest(&self, guest_id: GuestId) -> Option<&Table> {
        self.tables
            .values()
            .find(|t| t.occupant == Some(guest_id))
    }
}

/// In-memory store for guests and tables
///
/// All maps sit behind one mutex, so every trait method (including
/// `commit_seating`) observes and mutates a consistent snapshot. Ids start
/// at 1 and are never reused; scans run in ascending id order.
///
/// The referential rules of the SQLite schema are mirrored here: a guest
/// can occupy at most one table, and record writes that would break a
/// seating are refused under the same lock that applies them.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, State>> {
        self.state.lock().map_err(|_| {
            ExError::new(ExErrorKind::Internal)
                .with_op("memory_store")
                .with_message("store lock poisoned")
        })
    }
}

impl GuestStore for MemoryStore {
    fn create_guest(&self, guest: &NewGuest) -> StoreResult<Guest> {
        let mut state = self.lock()?;
        state.last_guest_id += 1;
        let created = Guest::new(state.last_guest_id, guest.name.clone(), guest.party_size);
        state.guests.insert(created.id, created.clone());
        Ok(created)
    }

    fn get_guest(&self, id: GuestId) -> StoreResult<Option<Guest>> {
        Ok(self.lock()?.guests.get(&id).cloned())
    }

    fn list_guests(&self, filter: GuestFilter) -> StoreResult<Vec<Guest>> {
        Ok(self
            .lock()?
            .guests
            .values()
            .filter(|g| filter.matches(g))
            .cloned()
            .collect())
    }

    fn update_guest(&self, id: GuestId, update: &GuestUpdate) -> StoreResult<WriteOutcome> {
        let mut state = self.lock()?;
        if !state.guests.contains_key(&id) {
            return Ok(WriteOutcome::Missing);
        }
        if let (Some(party_size), Some(table)) = (update.party_size, state.table_for_guest(id)) {
            if seats_required(party_size) > u64::from(table.capacity) {
                return Ok(WriteOutcome::Occupied {
                    table_id: table.id,
                    guest_id: id,
                });
            }
        }
        if let Some(guest) = state.guests.get_mut(&id) {
            update.apply_to(guest);
        }
        Ok(WriteOutcome::Applied)
    }

    fn delete_guest(&self, id: GuestId) -> StoreResult<WriteOutcome> {
        let mut state = self.lock()?;
        if let Some(table) = state.table_for_guest(id) {
            return Ok(WriteOutcome::Occupied {
                table_id: table.id,
                guest_id: id,
            });
        }
        Ok(match state.guests.remove(&id) {
            Some(_) => WriteOutcome::Applied,
            None => WriteOutcome::Missing,
        })
    }
}

impl TableStore for MemoryStore {
    fn create_table(&self, table: &NewTable) -> StoreResult<Table> {
        let mut state = self.lock()?;
        state.last_table_id += 1;
        let created = Table::new(state.last_table_id, table.capacity);
        state.tables.insert(created.id, created.clone());
        Ok(created)
    }

    fn get_table(&self, id: TableId) -> StoreResult<Option<Table>> {
        Ok(self.lock()?.tables.get(&id).cloned())
    }

    fn find_table(&self, min_capacity: u64) -> StoreResult<Option<Table>> {
        Ok(self
            .lock()?
            .tables
            .values()
            .find(|t| t.can_seat(min_capacity))
            .cloned())
    }

    fn list_tables(&self) -> StoreResult<Vec<Table>> {
        Ok(self.lock()?.tables.values().cloned().collect())
    }

    fn list_free_tables(&self) -> StoreResult<Vec<Table>> {
        Ok(self
            .lock()?
            .tables
            .values()
            .filter(|t| t.is_free())
            .cloned()
            .collect())
    }

    fn list_occupied_tables(&self) -> StoreResult<Vec<OccupiedTable>> {
        let state = self.lock()?;
        Ok(state
            .tables
            .values()
            .filter_map(|table| {
                let guest = state.guests.get(&table.occupant?)?;
                Some(OccupiedTable {
                    table_id: table.id,
                    capacity: table.capacity,
                    guest_id: guest.id,
                    guest_name: guest.name.clone(),
                    party_size: guest.party_size,
                })
            })
            .collect())
    }

    fn update_table(&self, id: TableId, update: &TableUpdate) -> StoreResult<WriteOutcome> {
        let mut state = self.lock()?;
        if let Some(guest_id) = update.occupant {
            if !state.guests.contains_key(&guest_id) {
                return Err(ExError::new(ExErrorKind::ConstraintViolation)
                    .with_op("update_table")
                    .with_entity_id(id)
                    .with_message(format!("unknown guest {}", guest_id)));
            }
            if let Some(other) = state.table_for_guest(guest_id) {
                if other.id != id {
                    return Err(ExError::new(ExErrorKind::ConstraintViolation)
                        .with_op("update_table")
                        .with_entity_id(id)
                        .with_message(format!(
                            "guest {} already occupies table {}",
                            guest_id, other.id
                        )));
                }
            }
        }
        let Some(table) = state.tables.get(&id) else {
            return Ok(WriteOutcome::Missing);
        };

        let mut after = table.clone();
        update.apply_to(&mut after);
        if let Some(guest_id) = after.occupant {
            let needed = state
                .guests
                .get(&guest_id)
                .map_or(1, |g| g.seats_required());
            if needed > u64::from(after.capacity) {
                return Ok(WriteOutcome::Occupied {
                    table_id: id,
                    guest_id,
                });
            }
        }

        state.tables.insert(id, after);
        Ok(WriteOutcome::Applied)
    }

    fn delete_table(&self, id: TableId) -> StoreResult<WriteOutcome> {
        let mut state = self.lock()?;
        let occupant = match state.tables.get(&id) {
            Some(table) => table.occupant,
            None => return Ok(WriteOutcome::Missing),
        };
        if let Some(guest_id) = occupant {
            return Ok(WriteOutcome::Occupied {
                table_id: id,
                guest_id,
            });
        }
        state.tables.remove(&id);
        Ok(WriteOutcome::Applied)
    }
}

impl SeatingStore for MemoryStore {
    fn commit_seating(&self, claim: &SeatingClaim) -> StoreResult<ClaimOutcome> {
        let mut state = self.lock()?;

        match state.guests.get(&claim.guest_id) {
            None => return Ok(ClaimOutcome::GuestMissing),
            Some(guest) if guest.arrived() => return Ok(ClaimOutcome::GuestAlreadySeated),
            Some(_) => {}
        }

        let table_ok = state
            .tables
            .get(&claim.table_id)
            .is_some_and(|t| t.can_seat(claim.seats_required()));
        if !table_ok {
            return Ok(ClaimOutcome::TableTaken);
        }

        if let Some(guest) = state.guests.get_mut(&claim.guest_id) {
            claim.guest_update().apply_to(guest);
        }
        if let Some(table) = state.tables.get_mut(&claim.table_id) {
            claim.table_update().apply_to(table);
        }
        Ok(ClaimOutcome::Committed)
    }
}
