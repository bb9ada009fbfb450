use crate::errors::{Result, SeatingError};
use crate::model::{Guest, GuestFilter, GuestId, GuestUpdate, NewGuest};
use crate::repository::{GuestStore, WriteOutcome};
use crate::rules::validate_name;

/// Create a guest who has not arrived yet
///
/// # Errors
/// * `InvalidName` - If name is empty or whitespace-only
/// * `StoreFailure` - If the store rejects the write
pub fn create_guest<S: GuestStore + ?Sized>(
    store: &S,
    name: String,
    party_size: u32,
) -> Result<Guest> {
    validate_name(&name)?;
    Ok(store.create_guest(&NewGuest::new(name, party_size))?)
}

/// Read a guest by ID
///
/// # Errors
/// * `GuestNotFound` - If the guest doesn't exist
pub fn read_guest<S: GuestStore + ?Sized>(store: &S, id: GuestId) -> Result<Guest> {
    store
        .get_guest(id)?
        .ok_or(SeatingError::GuestNotFound { guest_id: id })
}

/// Change a guest's name and/or party size
///
/// Arrival time is not editable; only seating sets it. A seated guest's
/// party may not grow beyond the table they occupy; the store checks this
/// in the same step as the write, so a concurrent seating cannot slip in
/// between.
///
/// # Errors
/// * `InvalidName` - If name is provided but is empty or whitespace-only
/// * `GuestNotFound` - If the guest doesn't exist
/// * `TableOccupied` - If the new party size no longer fits the guest's table
pub fn update_guest<S: GuestStore + ?Sized>(
    store: &S,
    id: GuestId,
    name: Option<String>,
    party_size: Option<u32>,
) -> Result<Guest> {
    if let Some(ref n) = name {
        validate_name(n)?;
    }

    let mut update = GuestUpdate::new();
    update.name = name;
    update.party_size = party_size;
    if update.is_empty() {
        return read_guest(store, id);
    }

    match store.update_guest(id, &update)? {
        WriteOutcome::Applied => read_guest(store, id),
        WriteOutcome::Missing => Err(SeatingError::GuestNotFound { guest_id: id }),
        WriteOutcome::Occupied { table_id, guest_id } => {
            Err(SeatingError::TableOccupied { table_id, guest_id })
        }
    }
}

/// Delete a guest who is not seated
///
/// # Errors
/// * `GuestNotFound` - If the guest doesn't exist
/// * `GuestSeated` - If the guest occupies a table
pub fn delete_guest<S: GuestStore + ?Sized>(store: &S, id: GuestId) -> Result<()> {
    match store.delete_guest(id)? {
        WriteOutcome::Applied => Ok(()),
        WriteOutcome::Missing => Err(SeatingError::GuestNotFound { guest_id: id }),
        WriteOutcome::Occupied { table_id, guest_id } => {
            Err(SeatingError::GuestSeated { guest_id, table_id })
        }
    }
}

/// List guests, optionally only those who have arrived
///
/// # Errors
/// * `StoreFailure` - If the store read fails
pub fn list_guests<S: GuestStore + ?Sized>(store: &S, filter: GuestFilter) -> Result<Vec<Guest>> {
    Ok(store.list_guests(filter)?)
}
