//! Capability traits for guest and table persistence
//!
//! The seating engine and the record-management operations only ever talk
//! to storage through these traits. `MemoryStore` (this crate) and
//! `SqliteStore` (seatplan-store) implement all of them.
//!
//! Adapters report infrastructure problems as `ExError`; "not found" is an
//! `Ok(None)` / `WriteOutcome::Missing` so callers can map it to their own
//! error.

#![allow(clippy::result_large_err)]

use chrono::{DateTime, Utc};

use crate::errors::ExError;
use crate::model::{
    seats_required, Guest, GuestFilter, GuestId, GuestUpdate, NewGuest, NewTable, OccupiedTable,
    Table, TableId, TableUpdate,
};

/// Result type for store adapters
pub type StoreResult<T> = std::result::Result<T, ExError>;

/// Guest record access
pub trait GuestStore: Send + Sync {
    /// Insert a guest and return it with its assigned id
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if the write fails.
    fn create_guest(&self, guest: &NewGuest) -> StoreResult<Guest>;

    /// Load one guest
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if the read fails.
    fn get_guest(&self, id: GuestId) -> StoreResult<Option<Guest>>;

    /// List guests matching the filter, in ascending id order
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if the read fails.
    fn list_guests(&self, filter: GuestFilter) -> StoreResult<Vec<Guest>>;

    /// Write the selected fields
    ///
    /// Refused with `WriteOutcome::Occupied` when a new party size no longer
    /// fits the table the guest occupies. The check and the write are one
    /// atomic step.
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if the write fails.
    fn update_guest(&self, id: GuestId, update: &GuestUpdate) -> StoreResult<WriteOutcome>;

    /// Remove a guest unless they occupy a table
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if the write fails.
    fn delete_guest(&self, id: GuestId) -> StoreResult<WriteOutcome>;
}

/// Table record access
pub trait TableStore: Send + Sync {
    /// Insert a table and return it with its assigned id
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if the write fails.
    fn create_table(&self, table: &NewTable) -> StoreResult<Table>;

    /// Load one table
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if the read fails.
    fn get_table(&self, id: TableId) -> StoreResult<Option<Table>>;

    /// First free table (in scan order) with at least `min_capacity` seats
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if the read fails.
    fn find_table(&self, min_capacity: u64) -> StoreResult<Option<Table>>;

    /// All tables, in ascending id order
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if the read fails.
    fn list_tables(&self) -> StoreResult<Vec<Table>>;

    /// Tables with no occupant
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if the read fails.
    fn list_free_tables(&self) -> StoreResult<Vec<Table>>;

    /// Occupied tables joined with their guest
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if the read fails.
    fn list_occupied_tables(&self) -> StoreResult<Vec<OccupiedTable>>;

    /// Write the selected fields
    ///
    /// Refused with `WriteOutcome::Occupied` when the resulting occupant's
    /// party would not fit the resulting capacity. The check and the write
    /// are one atomic step.
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::ConstraintViolation` if the occupant is unknown
    /// or already seated elsewhere, `ExErrorKind::Persistence` if the write
    /// fails.
    fn update_table(&self, id: TableId, update: &TableUpdate) -> StoreResult<WriteOutcome>;

    /// Remove a table unless it is occupied
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if the write fails.
    fn delete_table(&self, id: TableId) -> StoreResult<WriteOutcome>;
}

/// What happened to a guarded record write
///
/// Anything other than `Applied` means nothing was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Applied,
    /// No record with that id
    Missing,
    /// The write would break the seating of `guest_id` at `table_id`
    Occupied { table_id: TableId, guest_id: GuestId },
}

/// The pair of writes that seats a guest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatingClaim {
    pub guest_id: GuestId,
    pub table_id: TableId,
    /// Companions to record on the guest
    pub party_size: u32,
    pub arrival_time: DateTime<Utc>,
}

impl SeatingClaim {
    /// Seats the claimed table must still offer
    pub fn seats_required(&self) -> u64 {
        seats_required(self.party_size)
    }

    /// Guest-side half of the claim
    pub fn guest_update(&self) -> GuestUpdate {
        GuestUpdate::new()
            .with_party_size(self.party_size)
            .with_arrival_time(self.arrival_time)
    }

    /// Table-side half of the claim
    pub fn table_update(&self) -> TableUpdate {
        TableUpdate::new().with_occupant(self.guest_id)
    }
}

/// What happened to a seating claim
///
/// Anything other than `Committed` means nothing was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// Guest marked arrived and table occupied
    Committed,
    /// Table was taken, removed, or shrunk since it was found
    TableTaken,
    /// Guest arrived in the meantime
    GuestAlreadySeated,
    /// Guest no longer exists
    GuestMissing,
}

/// Stores that can seat a guest atomically
pub trait SeatingStore: GuestStore + TableStore {
    /// Apply both halves of the claim as one all-or-nothing unit
    ///
    /// The guest write is conditional on the guest not having arrived; the
    /// table write is conditional on the table being free and still having
    /// `claim.seats_required()` seats.
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` or `ExErrorKind::Timeout` if the
    /// transaction cannot complete; no partial effects remain in that case.
    fn commit_seating(&self, claim: &SeatingClaim) -> StoreResult<ClaimOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_halves() {
        let now = Utc::now();
        let claim = SeatingClaim {
            guest_id: 5,
            table_id: 1,
            party_size: 4,
            arrival_time: now,
        };

        assert_eq!(claim.seats_required(), 5);
        assert_eq!(
            claim.guest_update(),
            GuestUpdate::new().with_party_size(4).with_arrival_time(now)
        );
        assert_eq!(claim.table_update(), TableUpdate::new().with_occupant(5));
    }
}
