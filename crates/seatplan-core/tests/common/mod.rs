use chrono::Utc;
use seatplan_core::{
    ClaimOutcome, Guest, GuestStore, MemoryStore, NewGuest, NewTable, SeatingClaim, SeatingStore,
    Table, TableStore,
};

/// Create a new empty store for testing
#[allow(dead_code)]
pub fn new_store() -> MemoryStore {
    MemoryStore::new()
}

/// Insert a guest directly, bypassing validation
#[allow(dead_code)]
pub fn add_guest(store: &MemoryStore, name: &str, party_size: u32) -> Guest {
    store
        .create_guest(&NewGuest::new(name, party_size))
        .expect("create guest")
}

/// Insert a table directly, bypassing validation
#[allow(dead_code)]
pub fn add_table(store: &MemoryStore, capacity: u32) -> Table {
    store
        .create_table(&NewTable::new(capacity))
        .expect("create table")
}

/// Seat a guest at a specific table through the store's atomic claim
#[allow(dead_code)]
pub fn seat_directly(store: &MemoryStore, guest: &Guest, table: &Table, party_size: u32) {
    let outcome = store
        .commit_seating(&SeatingClaim {
            guest_id: guest.id,
            table_id: table.id,
            party_size,
            arrival_time: Utc::now(),
        })
        .expect("commit seating");
    assert_eq!(outcome, ClaimOutcome::Committed);
}
