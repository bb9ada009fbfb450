use serde::{Deserialize, Serialize};

use super::guest::GuestId;
use super::table::TableId;

/// Seats needed for a guest plus `party_size` companions
///
/// Widened to u64 so the largest party size cannot overflow.
pub fn seats_required(party_size: u32) -> u64 {
    u64::from(party_size) + 1
}

/// Result of a successful seat assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seating {
    pub guest_id: GuestId,
    pub table_id: TableId,
}

/// An occupied table joined with the identity of the guest seated there
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupiedTable {
    pub table_id: TableId,
    pub capacity: u32,
    pub guest_id: GuestId,
    pub guest_name: String,
    pub party_size: u32,
}
