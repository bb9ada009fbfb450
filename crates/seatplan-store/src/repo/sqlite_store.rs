//! SQLite implementation of the seatplan-core store traits

#![allow(clippy::result_large_err)]

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use seatplan_core::errors::{ExError, ExErrorKind};
use seatplan_core::model::{
    seats_required, Guest, GuestFilter, GuestId, GuestUpdate, NewGuest, NewTable, OccupiedTable,
    Table, TableId, TableUpdate,
};
use seatplan_core::repository::{
    ClaimOutcome, GuestStore, SeatingClaim, SeatingStore, StoreResult, TableStore, WriteOutcome,
};

use crate::db;
use crate::errors::{corrupt_row, from_rusqlite, Result};
use crate::migrations::apply_migrations;

const GUEST_COLUMNS: &str = "id, name, party_size, arrival_time";
const TABLE_COLUMNS: &str = "id, capacity, guest_id";

/// Guest row as stored, before timestamp decoding
struct GuestRow {
    id: GuestId,
    name: String,
    party_size: u32,
    arrival_millis: Option<i64>,
}

impl GuestRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            party_size: row.get(2)?,
            arrival_millis: row.get(3)?,
        })
    }

    fn into_guest(self) -> Result<Guest> {
        let arrival_time = match self.arrival_millis {
            Some(ms) => Some(from_millis(ms).ok_or_else(|| {
                corrupt_row("guests", self.id, "arrival_time out of range")
            })?),
            None => None,
        };
        Ok(Guest {
            id: self.id,
            name: self.name,
            party_size: self.party_size,
            arrival_time,
        })
    }
}

fn table_from_row(row: &Row<'_>) -> rusqlite::Result<Table> {
    Ok(Table {
        id: row.get(0)?,
        capacity: row.get(1)?,
        occupant: row.get(2)?,
    })
}

fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

/// Clamp a seat count into SQLite's integer range
fn seats_param(seats: u64) -> i64 {
    i64::try_from(seats).unwrap_or(i64::MAX)
}

/// Why a guarded write to `guests` touched no row
fn guest_write_refused(tx: &Transaction<'_>, id: GuestId) -> StoreResult<WriteOutcome> {
    let exists = tx
        .query_row("SELECT 1 FROM guests WHERE id = ?1", [id], |_| Ok(()))
        .optional()
        .map_err(from_rusqlite)?
        .is_some();
    if !exists {
        return Ok(WriteOutcome::Missing);
    }
    let table_id: Option<TableId> = tx
        .query_row("SELECT id FROM tables WHERE guest_id = ?1", [id], |row| {
            row.get(0)
        })
        .optional()
        .map_err(from_rusqlite)?;
    match table_id {
        Some(table_id) => Ok(WriteOutcome::Occupied {
            table_id,
            guest_id: id,
        }),
        None => Err(ExError::new(ExErrorKind::Internal)
            .with_op("sqlite_guest_write")
            .with_entity_id(id)
            .with_message("write refused for an unseated guest")),
    }
}

/// Why a guarded write to `tables` touched no row
fn table_write_refused(
    tx: &Transaction<'_>,
    id: TableId,
    new_occupant: Option<GuestId>,
) -> StoreResult<WriteOutcome> {
    let current: Option<Option<GuestId>> = tx
        .query_row("SELECT guest_id FROM tables WHERE id = ?1", [id], |row| {
            row.get(0)
        })
        .optional()
        .map_err(from_rusqlite)?;
    match current.map(|occupant| new_occupant.or(occupant)) {
        None => Ok(WriteOutcome::Missing),
        Some(Some(guest_id)) => Ok(WriteOutcome::Occupied {
            table_id: id,
            guest_id,
        }),
        Some(None) => Err(ExError::new(ExErrorKind::Internal)
            .with_op("sqlite_table_write")
            .with_entity_id(id)
            .with_message("write refused for a free table")),
    }
}

/// SQLite-backed store
///
/// One connection per store, guarded by a mutex. Several stores (in one
/// process or many) may share a database file; cross-connection safety
/// comes from SQLite locking plus conditional writes: `commit_seating`
/// and every record write that could break a seating carry their guard in
/// the `WHERE` clause.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database file, configure it and apply migrations
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if the file cannot be opened or
    /// migrated, `ExErrorKind::Timeout` if it stays locked past
    /// `busy_timeout`, `ExErrorKind::ConstraintViolation` on a migration
    /// checksum mismatch.
    pub fn open<P: AsRef<Path>>(path: P, busy_timeout: Duration) -> Result<Self> {
        let conn = db::open(path)?;
        db::configure(&conn, busy_timeout)?;
        Self::from_connection(conn)
    }

    /// Fresh private in-memory database with the schema applied
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if the schema cannot be created.
    pub fn in_memory() -> Result<Self> {
        let conn = db::open_in_memory()?;
        db::configure(&conn, db::DEFAULT_BUSY_TIMEOUT)?;
        Self::from_connection(conn)
    }

    /// Wrap an already configured connection, applying pending migrations
    ///
    /// # Errors
    ///
    /// Returns the migration runner's error if the schema cannot be brought
    /// up to date.
    pub fn from_connection(mut conn: Connection) -> Result<Self> {
        apply_migrations(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| {
            ExError::new(ExErrorKind::Internal)
                .with_op("sqlite_store")
                .with_message("connection lock poisoned")
        })
    }

    fn query_tables(&self, sql: &str, params: impl rusqlite::Params) -> StoreResult<Vec<Table>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map(params, table_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(rows)
    }
}

impl GuestStore for SqliteStore {
    fn create_guest(&self, guest: &NewGuest) -> StoreResult<Guest> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO guests (name, party_size) VALUES (?1, ?2)",
            rusqlite::params![guest.name, guest.party_size],
        )
        .map_err(from_rusqlite)?;
        Ok(Guest::new(
            conn.last_insert_rowid(),
            guest.name.clone(),
            guest.party_size,
        ))
    }

    fn get_guest(&self, id: GuestId) -> StoreResult<Option<Guest>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {} FROM guests WHERE id = ?1", GUEST_COLUMNS),
                [id],
                GuestRow::from_row,
            )
            .optional()
            .map_err(from_rusqlite)?;
        row.map(GuestRow::into_guest).transpose()
    }

    fn list_guests(&self, filter: GuestFilter) -> StoreResult<Vec<Guest>> {
        let sql = if filter.arrived_only {
            format!(
                "SELECT {} FROM guests WHERE arrival_time IS NOT NULL ORDER BY id",
                GUEST_COLUMNS
            )
        } else {
            format!("SELECT {} FROM guests ORDER BY id", GUEST_COLUMNS)
        };

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([], GuestRow::from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        rows.into_iter().map(GuestRow::into_guest).collect()
    }

    fn update_guest(&self, id: GuestId, update: &GuestUpdate) -> StoreResult<WriteOutcome> {
        let mut conn = self.conn()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(from_rusqlite)?;

        // COALESCE keeps unset fields; zero values are still written. A new
        // party size must still fit the table the guest occupies, if any.
        let changed = tx
            .execute(
                "UPDATE guests SET
                    name = COALESCE(?1, name),
                    party_size = COALESCE(?2, party_size),
                    arrival_time = COALESCE(?3, arrival_time)
                 WHERE id = ?4
                   AND (?5 IS NULL OR NOT EXISTS (
                        SELECT 1 FROM tables
                        WHERE guest_id = guests.id AND capacity < ?5))",
                rusqlite::params![
                    update.name,
                    update.party_size,
                    update.arrival_time.map(|t| t.timestamp_millis()),
                    id,
                    update.party_size.map(|p| seats_param(seats_required(p)))
                ],
            )
            .map_err(from_rusqlite)?;
        if changed == 0 {
            return guest_write_refused(&tx, id);
        }

        tx.commit().map_err(from_rusqlite)?;
        Ok(WriteOutcome::Applied)
    }

    fn delete_guest(&self, id: GuestId) -> StoreResult<WriteOutcome> {
        let mut conn = self.conn()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(from_rusqlite)?;

        let changed = tx
            .execute(
                "DELETE FROM guests
                 WHERE id = ?1
                   AND NOT EXISTS (SELECT 1 FROM tables WHERE guest_id = ?1)",
                [id],
            )
            .map_err(|e| from_rusqlite(e).with_entity_id(id))?;
        if changed == 0 {
            return guest_write_refused(&tx, id);
        }

        tx.commit().map_err(from_rusqlite)?;
        Ok(WriteOutcome::Applied)
    }
}

impl TableStore for SqliteStore {
    fn create_table(&self, table: &NewTable) -> StoreResult<Table> {
        let conn = self.conn()?;
        conn.execute("INSERT INTO tables (capacity) VALUES (?1)", [table.capacity])
            .map_err(from_rusqlite)?;
        Ok(Table::new(conn.last_insert_rowid(), table.capacity))
    }

    fn get_table(&self, id: TableId) -> StoreResult<Option<Table>> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM tables WHERE id = ?1", TABLE_COLUMNS),
            [id],
            table_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    fn find_table(&self, min_capacity: u64) -> StoreResult<Option<Table>> {
        let conn = self.conn()?;
        conn.query_row(
            &format!(
                "SELECT {} FROM tables
                 WHERE guest_id IS NULL AND capacity >= ?1
                 ORDER BY id LIMIT 1",
                TABLE_COLUMNS
            ),
            [seats_param(min_capacity)],
            table_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    fn list_tables(&self) -> StoreResult<Vec<Table>> {
        self.query_tables(
            &format!("SELECT {} FROM tables ORDER BY id", TABLE_COLUMNS),
            [],
        )
    }

    fn list_free_tables(&self) -> StoreResult<Vec<Table>> {
        self.query_tables(
            &format!(
                "SELECT {} FROM tables WHERE guest_id IS NULL ORDER BY id",
                TABLE_COLUMNS
            ),
            [],
        )
    }

    fn list_occupied_tables(&self) -> StoreResult<Vec<OccupiedTable>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT t.id, t.capacity, g.id, g.name, g.party_size
                 FROM tables t
                 JOIN guests g ON g.id = t.guest_id
                 ORDER BY t.id",
            )
            .map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(OccupiedTable {
                    table_id: row.get(0)?,
                    capacity: row.get(1)?,
                    guest_id: row.get(2)?,
                    guest_name: row.get(3)?,
                    party_size: row.get(4)?,
                })
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(rows)
    }

    fn update_table(&self, id: TableId, update: &TableUpdate) -> StoreResult<WriteOutcome> {
        let mut conn = self.conn()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(from_rusqlite)?;

        // The resulting occupant's party must fit the resulting capacity.
        // An unknown occupant passes the guard and trips the foreign key.
        let changed = tx
            .execute(
                "UPDATE tables SET
                    capacity = COALESCE(?1, capacity),
                    guest_id = COALESCE(?2, guest_id)
                 WHERE id = ?3
                   AND COALESCE(?1, capacity) >= COALESCE(
                        (SELECT party_size + 1 FROM guests
                         WHERE id = COALESCE(?2, tables.guest_id)),
                        0)",
                rusqlite::params![update.capacity, update.occupant, id],
            )
            .map_err(|e| from_rusqlite(e).with_entity_id(id))?;
        if changed == 0 {
            return table_write_refused(&tx, id, update.occupant);
        }

        tx.commit().map_err(from_rusqlite)?;
        Ok(WriteOutcome::Applied)
    }

    fn delete_table(&self, id: TableId) -> StoreResult<WriteOutcome> {
        let mut conn = self.conn()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(from_rusqlite)?;

        let changed = tx
            .execute("DELETE FROM tables WHERE id = ?1 AND guest_id IS NULL", [id])
            .map_err(from_rusqlite)?;
        if changed == 0 {
            return table_write_refused(&tx, id, None);
        }

        tx.commit().map_err(from_rusqlite)?;
        Ok(WriteOutcome::Applied)
    }
}

impl SeatingStore for SqliteStore {
    fn commit_seating(&self, claim: &SeatingClaim) -> StoreResult<ClaimOutcome> {
        let mut conn = self.conn()?;
        // IMMEDIATE takes the write lock up front so the checks below and
        // the writes see the same database state
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(from_rusqlite)?;

        let arrival: Option<Option<i64>> = tx
            .query_row(
                "SELECT arrival_time FROM guests WHERE id = ?1",
                [claim.guest_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(from_rusqlite)?;
        match arrival {
            None => return Ok(ClaimOutcome::GuestMissing),
            Some(Some(_)) => return Ok(ClaimOutcome::GuestAlreadySeated),
            Some(None) => {}
        }

        let claimed = tx
            .execute(
                "UPDATE tables SET guest_id = ?1
                 WHERE id = ?2 AND guest_id IS NULL AND capacity >= ?3",
                rusqlite::params![
                    claim.guest_id,
                    claim.table_id,
                    seats_param(claim.seats_required())
                ],
            )
            .map_err(from_rusqlite)?;
        if claimed == 0 {
            tracing::debug!(
                table_id = claim.table_id,
                guest_id = claim.guest_id,
                "table no longer available"
            );
            return Ok(ClaimOutcome::TableTaken);
        }

        let seated = tx
            .execute(
                "UPDATE guests SET party_size = ?1, arrival_time = ?2
                 WHERE id = ?3 AND arrival_time IS NULL",
                rusqlite::params![
                    claim.party_size,
                    claim.arrival_time.timestamp_millis(),
                    claim.guest_id
                ],
            )
            .map_err(from_rusqlite)?;
        if seated == 0 {
            return Ok(ClaimOutcome::GuestAlreadySeated);
        }

        tx.commit().map_err(from_rusqlite)?;
        Ok(ClaimOutcome::Committed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_millis_round_trip() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).single().unwrap();
        assert_eq!(from_millis(now.timestamp_millis()), Some(now));
    }

    #[test]
    fn test_seats_param_clamps() {
        assert_eq!(seats_param(6), 6);
        assert_eq!(seats_param(u64::MAX), i64::MAX);
    }

    #[test]
    fn test_in_memory_store_starts_empty() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.list_tables().unwrap().is_empty());
        assert!(store.list_guests(GuestFilter::all()).unwrap().is_empty());
    }
}
