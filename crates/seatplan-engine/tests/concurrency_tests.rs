#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use common::{add_guests, add_tables};
use seatplan_core::ops::table_ops;
use seatplan_core::{
    GuestFilter, GuestStore, MemoryStore, Result, Seating, SeatingError, SeatingStore, TableId,
    TableStore,
};
use seatplan_engine::SeatingEngine;
use seatplan_store::SqliteStore;

const RACERS: usize = 16;

fn racer_names() -> Vec<(String, u32)> {
    (0..RACERS).map(|i| (format!("racer {}", i), 0)).collect()
}

fn seed<S: SeatingStore>(store: &S) -> Vec<i64> {
    // one table that fits exactly one party of three
    add_tables(store, &[5]);
    let names = racer_names();
    let guests: Vec<(&str, u32)> = names.iter().map(|(n, p)| (n.as_str(), *p)).collect();
    add_guests(store, &guests)
}

fn assert_single_winner(results: &[Result<Seating>]) {
    let winners = results.iter().filter(|r| r.is_ok()).count();
    let no_seats = results
        .iter()
        .filter(|r| matches!(r, Err(SeatingError::NoAvailableSeats { seats_required: 3 })))
        .count();
    assert_eq!(winners, 1, "results: {:?}", results);
    assert_eq!(no_seats, RACERS - 1, "results: {:?}", results);
}

#[test]
fn test_race_for_single_table_in_memory() {
    // GIVEN one shared engine over an in-memory store
    let store = MemoryStore::new();
    let guests = seed(&store);
    let engine = Arc::new(SeatingEngine::new(store));
    let barrier = Arc::new(Barrier::new(RACERS));

    // WHEN every guest tries to claim the table at once
    let handles: Vec<_> = guests
        .into_iter()
        .map(|guest_id| {
            let engine = engine.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                engine.assign_seat(guest_id, 2)
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    // THEN exactly one wins
    assert_single_winner(&results);
    assert_eq!(engine.occupied_seats().unwrap().len(), 1);
    assert_eq!(engine.free_seat_count().unwrap(), 0);
}

#[test]
fn test_race_for_single_table_across_sqlite_connections() {
    // GIVEN a database file and one engine per thread, each with its own connection
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("race.db");
    let busy = Duration::from_secs(10);
    let guests = seed(&SqliteStore::open(&path, busy).unwrap());
    let barrier = Arc::new(Barrier::new(RACERS));

    let handles: Vec<_> = guests
        .into_iter()
        .map(|guest_id| {
            let path = path.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                let engine = SeatingEngine::new(SqliteStore::open(&path, busy).unwrap());
                barrier.wait();
                engine.assign_seat(guest_id, 2)
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    // THEN exactly one wins and the file agrees
    assert_single_winner(&results);
    let engine = SeatingEngine::new(SqliteStore::open(&path, busy).unwrap());
    assert_eq!(engine.occupied_seats().unwrap().len(), 1);
}

#[test]
fn test_same_guest_racing_is_seated_once() {
    let store = MemoryStore::new();
    add_tables(&store, &[4, 4, 4, 4]);
    add_guests(&store, &[("Ada", 0)]);
    let engine = Arc::new(SeatingEngine::new(store));
    let barrier = Arc::new(Barrier::new(4));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = engine.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                engine.assign_seat(1, 1)
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| *e == SeatingError::AlreadySeated { guest_id: 1 }));
    assert_eq!(engine.occupied_seats().unwrap().len(), 1);
}

const EDITED_TABLES: usize = 8;

fn seed_for_edits<S: SeatingStore>(store: &S) -> (Vec<TableId>, Vec<i64>) {
    let tables = add_tables(store, &[10; EDITED_TABLES]);
    let names: Vec<String> = (0..EDITED_TABLES).map(|i| format!("party {}", i)).collect();
    let guests: Vec<(&str, u32)> = names.iter().map(|n| (n.as_str(), 0)).collect();
    (tables, add_guests(store, &guests))
}

/// Shrink every table below a party of nine, then try to delete it
fn edit_tables<S: TableStore + ?Sized>(store: &S, tables: &[TableId]) {
    for id in tables {
        for result in [
            table_ops::update_table_capacity(store, *id, 2).map(|_| ()),
            table_ops::delete_table(store, *id),
        ] {
            if let Err(e) = result {
                assert!(e.is_business_rule(), "unexpected failure: {:?}", e);
            }
        }
    }
}

fn seat_party_of_nine<S: SeatingStore>(engine: &SeatingEngine<S>, guest_id: i64) {
    match engine.assign_seat(guest_id, 8) {
        Ok(_) | Err(SeatingError::NoAvailableSeats { .. }) => {}
        Err(e) => panic!("unexpected failure: {:?}", e),
    }
}

fn assert_seatings_intact<S: SeatingStore>(store: &S) {
    let occupied = store.list_occupied_tables().unwrap();
    for t in &occupied {
        assert!(
            u64::from(t.party_size) + 1 <= u64::from(t.capacity),
            "party outgrew its table: {:?}",
            t
        );
    }
    let occupants: HashSet<_> = occupied.iter().map(|t| t.guest_id).collect();
    let arrived: HashSet<_> = store
        .list_guests(GuestFilter::arrived())
        .unwrap()
        .iter()
        .map(|g| g.id)
        .collect();
    assert_eq!(arrived, occupants, "every arrived guest keeps a table");
}

#[test]
fn test_table_edits_racing_seatings_in_memory() {
    // GIVEN free tables of 10 and guests about to arrive with parties of nine
    let store = MemoryStore::new();
    let (tables, guests) = seed_for_edits(&store);
    let engine = Arc::new(SeatingEngine::new(store));
    let barrier = Arc::new(Barrier::new(guests.len() + 1));

    // WHEN one thread shrinks and deletes tables while the guests are seated
    let mut handles: Vec<_> = guests
        .into_iter()
        .map(|guest_id| {
            let engine = engine.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                seat_party_of_nine(&*engine, guest_id);
            })
        })
        .collect();
    {
        let engine = engine.clone();
        let barrier = barrier.clone();
        handles.push(thread::spawn(move || {
            barrier.wait();
            edit_tables(engine.store(), &tables);
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    // THEN no seated party lost its table or its seats
    assert_seatings_intact(engine.store());
}

#[test]
fn test_table_edits_racing_seatings_across_sqlite_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edits.db");
    let busy = Duration::from_secs(10);
    let (tables, guests) = seed_for_edits(&SqliteStore::open(&path, busy).unwrap());
    let barrier = Arc::new(Barrier::new(guests.len() + 1));

    let mut handles: Vec<_> = guests
        .into_iter()
        .map(|guest_id| {
            let path = path.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                let engine = SeatingEngine::new(SqliteStore::open(&path, busy).unwrap());
                barrier.wait();
                seat_party_of_nine(&engine, guest_id);
            })
        })
        .collect();
    {
        let path = path.clone();
        let barrier = barrier.clone();
        handles.push(thread::spawn(move || {
            let store = SqliteStore::open(&path, busy).unwrap();
            barrier.wait();
            edit_tables(&store, &tables);
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    assert_seatings_intact(&SqliteStore::open(&path, busy).unwrap());
}
