use serde::{Deserialize, Serialize};

use super::guest::GuestId;

/// Store-assigned table identifier
pub type TableId = i64;

/// Table - a fixed number of seats that at most one party can occupy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Unique identifier, assigned by the store
    pub id: TableId,

    /// Total seats (always positive)
    pub capacity: u32,

    /// Guest currently seated here; None means the table is free
    pub occupant: Option<GuestId>,
}

impl Table {
    /// Create a free table
    pub fn new(id: TableId, capacity: u32) -> Self {
        Self {
            id,
            capacity,
            occupant: None,
        }
    }

    /// Check if no guest occupies this table
    pub fn is_free(&self) -> bool {
        self.occupant.is_none()
    }

    /// Check if this table is free and has at least `seats` seats
    pub fn can_seat(&self, seats: u64) -> bool {
        self.is_free() && u64::from(self.capacity) >= seats
    }
}

/// Fields for a table about to be created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewTable {
    pub capacity: u32,
}

impl NewTable {
    pub fn new(capacity: u32) -> Self {
        Self { capacity }
    }
}

/// Explicit set of table fields to change
///
/// There is no way to clear an occupant: seating is one-way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableUpdate {
    pub capacity: Option<u32>,
    pub occupant: Option<GuestId>,
}

impl TableUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn with_occupant(mut self, guest_id: GuestId) -> Self {
        self.occupant = Some(guest_id);
        self
    }

    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.capacity.is_none() && self.occupant.is_none()
    }

    /// Apply the selected fields to a table in place
    pub fn apply_to(&self, table: &mut Table) {
        if let Some(capacity) = self.capacity {
            table.capacity = capacity;
        }
        if let Some(guest_id) = self.occupant {
            table.occupant = Some(guest_id);
        }
    }
}
