//! Seat assignment and occupancy queries

use std::time::Instant;

use chrono::Utc;
use seatplan_core::errors::{Result, SeatingError};
use seatplan_core::model::{seats_required, GuestId, OccupiedTable, Seating};
use seatplan_core::repository::{ClaimOutcome, SeatingClaim, SeatingStore};
use seatplan_core::{log_op_end, log_op_error, log_op_start};

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Seating assignment engine
///
/// Holds no state of its own besides the injected store and does no
/// in-process locking, so one engine can serve many threads. Races between
/// concurrent assignments are settled by `SeatingStore::commit_seating`.
pub struct SeatingEngine<S> {
    store: S,
}

impl<S: SeatingStore> SeatingEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store, for record management
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Seat a guest and their companions at the first free table that fits
    ///
    /// `party_size` is the number of companions and replaces whatever the
    /// guest record held. The table needs `party_size + 1` seats.
    ///
    /// ## Errors
    ///
    /// - `AlreadySeated`: the guest has already arrived, whether or not a
    ///   table would fit
    /// - `NoAvailableSeats`: no free table is large enough
    /// - `GuestNotFound`: a table fits but the guest does not exist
    /// - `StoreFailure`: the store could not complete a read or the claim
    pub fn assign_seat(&self, guest_id: GuestId, party_size: u32) -> Result<Seating> {
        log_op_start!("assign_seat", guest_id = guest_id, party_size = party_size);
        let start = Instant::now();

        let seating = self.assign_seat_impl(guest_id, party_size).map_err(|e| {
            log_op_error!(
                "assign_seat",
                e,
                duration_ms = elapsed_ms(start),
                guest_id = guest_id
            );
            e
        })?;

        log_op_end!(
            "assign_seat",
            duration_ms = elapsed_ms(start),
            guest_id = seating.guest_id,
            table_id = seating.table_id
        );
        Ok(seating)
    }

    fn assign_seat_impl(&self, guest_id: GuestId, party_size: u32) -> Result<Seating> {
        let seats = seats_required(party_size);
        let mut attempt: u32 = 0;

        // Each lost race fills one more table for good, so this ends once
        // the search comes back empty or a claim commits.
        loop {
            attempt += 1;

            let found = self.store.find_table(seats)?;
            let guest = self.store.get_guest(guest_id)?;

            // A guest who is already seated is told so even when every
            // table is full; an unknown guest only surfaces once a table fits.
            if guest.as_ref().is_some_and(|g| g.arrived()) {
                return Err(SeatingError::AlreadySeated { guest_id });
            }
            let table = found.ok_or(SeatingError::NoAvailableSeats {
                seats_required: seats,
            })?;
            if guest.is_none() {
                return Err(SeatingError::GuestNotFound { guest_id });
            }

            let claim = SeatingClaim {
                guest_id,
                table_id: table.id,
                party_size,
                arrival_time: Utc::now(),
            };

            match self.store.commit_seating(&claim)? {
                ClaimOutcome::Committed => {
                    return Ok(Seating {
                        guest_id,
                        table_id: table.id,
                    })
                }
                ClaimOutcome::TableTaken => {
                    tracing::debug!(
                        attempt = attempt,
                        table_id = table.id,
                        seats_required = seats,
                        "table claimed concurrently, searching again"
                    );
                }
                ClaimOutcome::GuestAlreadySeated => {
                    return Err(SeatingError::AlreadySeated { guest_id })
                }
                ClaimOutcome::GuestMissing => {
                    return Err(SeatingError::GuestNotFound { guest_id })
                }
            }
        }
    }

    /// Every occupied table with the identity of its guest
    ///
    /// ## Errors
    ///
    /// - `StoreFailure`: the store read failed
    pub fn occupied_seats(&self) -> Result<Vec<OccupiedTable>> {
        log_op_start!("occupied_seats");
        let start = Instant::now();

        let occupied = self.store.list_occupied_tables().map_err(|e| {
            let err = SeatingError::from(e);
            log_op_error!("occupied_seats", err, duration_ms = elapsed_ms(start));
            err
        })?;

        log_op_end!(
            "occupied_seats",
            duration_ms = elapsed_ms(start),
            count = occupied.len() as u64
        );
        Ok(occupied)
    }

    /// Total seats across all free tables
    ///
    /// ## Errors
    ///
    /// - `StoreFailure`: the store read failed
    pub fn free_seat_count(&self) -> Result<u64> {
        log_op_start!("free_seat_count");
        let start = Instant::now();

        let free = self.store.list_free_tables().map_err(|e| {
            let err = SeatingError::from(e);
            log_op_error!("free_seat_count", err, duration_ms = elapsed_ms(start));
            err
        })?;
        let total: u64 = free.iter().map(|t| u64::from(t.capacity)).sum();

        log_op_end!(
            "free_seat_count",
            duration_ms = elapsed_ms(start),
            free_seats = total
        );
        Ok(total)
    }
}
