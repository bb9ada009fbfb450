use seatplan_core::{GuestId, GuestStore, NewGuest, NewTable, SeatingStore, TableId, TableStore};

/// Create tables with the given capacities, returning their ids
#[allow(dead_code)]
pub fn add_tables<S: SeatingStore>(store: &S, capacities: &[u32]) -> Vec<TableId> {
    capacities
        .iter()
        .map(|c| store.create_table(&NewTable::new(*c)).expect("create table").id)
        .collect()
}

/// Create guests with the given names and party sizes, returning their ids
#[allow(dead_code)]
pub fn add_guests<S: SeatingStore>(store: &S, guests: &[(&str, u32)]) -> Vec<GuestId> {
    guests
        .iter()
        .map(|(name, party)| {
            store
                .create_guest(&NewGuest::new(*name, *party))
                .expect("create guest")
                .id
        })
        .collect()
}
