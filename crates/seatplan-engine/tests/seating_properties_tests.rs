#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashSet;

use proptest::prelude::*;
use seatplan_core::{
    GuestFilter, GuestStore, MemoryStore, NewGuest, NewTable, SeatingError, TableStore,
};
use seatplan_engine::SeatingEngine;

#[derive(Debug, Clone)]
struct Request {
    guest_id: i64,
    party_size: u32,
}

fn arb_requests(guest_count: i64) -> impl Strategy<Value = Vec<Request>> {
    // ids past guest_count exercise unknown guests
    prop::collection::vec(
        (1..=guest_count + 2, 0u32..12).prop_map(|(guest_id, party_size)| Request {
            guest_id,
            party_size,
        }),
        0..40,
    )
}

fn arb_layout() -> impl Strategy<Value = (Vec<u32>, i64)> {
    (prop::collection::vec(1u32..12, 0..8), 1i64..10)
}

proptest! {
    #[test]
    fn prop_seating_invariants_hold(
        (capacities, guest_count) in arb_layout(),
        requests in arb_requests(10),
    ) {
        let store = MemoryStore::new();
        for c in &capacities {
            store.create_table(&NewTable::new(*c)).unwrap();
        }
        for i in 0..guest_count {
            store.create_guest(&NewGuest::new(format!("guest {}", i), 0)).unwrap();
        }
        let engine = SeatingEngine::new(store);

        let mut seated_guests = HashSet::new();
        let mut used_tables = HashSet::new();

        for req in &requests {
            match engine.assign_seat(req.guest_id, req.party_size) {
                Ok(seating) => {
                    // no double seating, no double occupancy
                    prop_assert!(seated_guests.insert(seating.guest_id));
                    prop_assert!(used_tables.insert(seating.table_id));
                }
                Err(SeatingError::AlreadySeated { guest_id }) => {
                    prop_assert!(seated_guests.contains(&guest_id));
                }
                Err(SeatingError::GuestNotFound { guest_id }) => {
                    prop_assert!(guest_id > guest_count);
                }
                Err(SeatingError::NoAvailableSeats { seats_required }) => {
                    prop_assert!(!seated_guests.contains(&req.guest_id));
                    prop_assert_eq!(seats_required, u64::from(req.party_size) + 1);
                    let fits = engine.store().find_table(seats_required).unwrap();
                    prop_assert!(fits.is_none());
                }
                Err(other) => prop_assert!(false, "unexpected error {:?}", other),
            }
        }

        // fill what is left, then every seated guest asks again
        for guest_id in 1..=guest_count {
            if seated_guests.contains(&guest_id) {
                continue;
            }
            match engine.assign_seat(guest_id, 0) {
                Ok(seating) => {
                    prop_assert!(used_tables.insert(seating.table_id));
                    seated_guests.insert(guest_id);
                }
                Err(SeatingError::NoAvailableSeats { .. }) => break,
                Err(other) => prop_assert!(false, "unexpected error {:?}", other),
            }
        }
        for guest_id in &seated_guests {
            for party_size in [0, 11] {
                prop_assert_eq!(
                    engine.assign_seat(*guest_id, party_size),
                    Err(SeatingError::AlreadySeated { guest_id: *guest_id })
                );
            }
        }

        // capacity invariant
        let occupied = engine.occupied_seats().unwrap();
        for t in &occupied {
            prop_assert!(u64::from(t.party_size) + 1 <= u64::from(t.capacity));
        }

        // free seat count matches tables absent from the occupied list
        let occupied_ids: HashSet<_> = occupied.iter().map(|t| t.table_id).collect();
        let expected_free: u64 = engine
            .store()
            .list_tables()
            .unwrap()
            .iter()
            .filter(|t| !occupied_ids.contains(&t.id))
            .map(|t| u64::from(t.capacity))
            .sum();
        prop_assert_eq!(engine.free_seat_count().unwrap(), expected_free);

        // arrival state matches occupancy exactly
        let arrived: HashSet<_> = engine
            .store()
            .list_guests(GuestFilter::arrived())
            .unwrap()
            .iter()
            .map(|g| g.id)
            .collect();
        let occupants: HashSet<_> = occupied.iter().map(|t| t.guest_id).collect();
        prop_assert_eq!(arrived, occupants.clone());
        prop_assert_eq!(occupants, seated_guests);
    }
}
