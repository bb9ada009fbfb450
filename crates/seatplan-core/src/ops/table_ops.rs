use crate::errors::{Result, SeatingError};
use crate::model::{NewTable, Table, TableId, TableUpdate};
use crate::repository::{TableStore, WriteOutcome};
use crate::rules::validate_capacity;

/// Create a free table
///
/// # Errors
/// * `InvalidCapacity` - If capacity is zero
pub fn create_table<S: TableStore + ?Sized>(store: &S, capacity: u32) -> Result<Table> {
    validate_capacity(capacity)?;
    Ok(store.create_table(&NewTable::new(capacity))?)
}

/// Read a table by ID
///
/// # Errors
/// * `TableNotFound` - If the table doesn't exist
pub fn read_table<S: TableStore + ?Sized>(store: &S, id: TableId) -> Result<Table> {
    store
        .get_table(id)?
        .ok_or(SeatingError::TableNotFound { table_id: id })
}

fn refused(id: TableId, outcome: WriteOutcome) -> SeatingError {
    match outcome {
        WriteOutcome::Occupied { table_id, guest_id } => {
            SeatingError::TableOccupied { table_id, guest_id }
        }
        WriteOutcome::Applied | WriteOutcome::Missing => {
            SeatingError::TableNotFound { table_id: id }
        }
    }
}

/// Change a table's seat count
///
/// An occupied table may grow, or shrink as long as the seated party
/// still fits. The store checks the party in the same step as the write.
///
/// # Errors
/// * `InvalidCapacity` - If capacity is zero
/// * `TableNotFound` - If the table doesn't exist
/// * `TableOccupied` - If the seated party would no longer fit
pub fn update_table_capacity<S: TableStore + ?Sized>(
    store: &S,
    id: TableId,
    capacity: u32,
) -> Result<Table> {
    validate_capacity(capacity)?;
    match store.update_table(id, &TableUpdate::new().with_capacity(capacity))? {
        WriteOutcome::Applied => read_table(store, id),
        other => Err(refused(id, other)),
    }
}

/// Delete a free table
///
/// # Errors
/// * `TableNotFound` - If the table doesn't exist
/// * `TableOccupied` - If a guest is seated there
pub fn delete_table<S: TableStore + ?Sized>(store: &S, id: TableId) -> Result<()> {
    match store.delete_table(id)? {
        WriteOutcome::Applied => Ok(()),
        other => Err(refused(id, other)),
    }
}

/// List every table
///
/// # Errors
/// * `StoreFailure` - If the store read fails
pub fn list_tables<S: TableStore + ?Sized>(store: &S) -> Result<Vec<Table>> {
    Ok(store.list_tables()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::MemoryStore;
    use crate::repository::{GuestStore, SeatingClaim, SeatingStore};
    use crate::NewGuest;
    use chrono::Utc;

    fn seated_table(store: &MemoryStore, capacity: u32, party_size: u32) -> (TableId, i64) {
        let table = create_table(store, capacity).unwrap();
        let guest = store.create_guest(&NewGuest::new("Ada", 0)).unwrap();
        store
            .commit_seating(&SeatingClaim {
                guest_id: guest.id,
                table_id: table.id,
                party_size,
                arrival_time: Utc::now(),
            })
            .unwrap();
        (table.id, guest.id)
    }

    #[test]
    fn test_create_table_rejects_zero_capacity() {
        let store = MemoryStore::new();
        assert_eq!(
            create_table(&store, 0),
            Err(SeatingError::InvalidCapacity { capacity: 0 })
        );
        assert!(list_tables(&store).unwrap().is_empty());
    }

    #[test]
    fn test_create_and_read_table() {
        let store = MemoryStore::new();
        let table = create_table(&store, 8).unwrap();

        assert_eq!(read_table(&store, table.id).unwrap(), Table::new(table.id, 8));
        assert_eq!(
            read_table(&store, 99),
            Err(SeatingError::TableNotFound { table_id: 99 })
        );
    }

    #[test]
    fn test_resize_free_table() {
        let store = MemoryStore::new();
        let table = create_table(&store, 8).unwrap();

        let resized = update_table_capacity(&store, table.id, 2).unwrap();
        assert_eq!(resized.capacity, 2);
    }

    #[test]
    fn test_resize_occupied_table_must_fit_party() {
        let store = MemoryStore::new();
        let (table_id, guest_id) = seated_table(&store, 8, 3);

        assert_eq!(update_table_capacity(&store, table_id, 4).unwrap().capacity, 4);
        assert_eq!(
            update_table_capacity(&store, table_id, 3),
            Err(SeatingError::TableOccupied { table_id, guest_id })
        );
        assert_eq!(read_table(&store, table_id).unwrap().capacity, 4);
    }

    #[test]
    fn test_delete_table() {
        let store = MemoryStore::new();
        let table = create_table(&store, 4).unwrap();

        delete_table(&store, table.id).unwrap();
        assert_eq!(
            delete_table(&store, table.id),
            Err(SeatingError::TableNotFound { table_id: table.id })
        );
    }

    #[test]
    fn test_delete_occupied_table_fails() {
        let store = MemoryStore::new();
        let (table_id, guest_id) = seated_table(&store, 4, 0);

        assert_eq!(
            delete_table(&store, table_id),
            Err(SeatingError::TableOccupied { table_id, guest_id })
        );
        assert!(read_table(&store, table_id).is_ok());
    }
}
