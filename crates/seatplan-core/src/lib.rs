//! SeatPlan Core - seating domain kernel
//!
//! This crate provides the foundational data structures and rules for
//! SeatPlan, including:
//! - Guest and Table models with explicit partial-update structs
//! - The canonical error facility (`ExError`) and the seating error taxonomy
//! - Capability traits for guest/table persistence (`repository`)
//! - An in-memory store implementing those traits
//! - Validated record-management operations for guests and tables
//! - The structured logging facility

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod repository;
pub mod rules;

// Re-exported so the logging macros resolve schema constants from any crate
pub use seatplan_core_types as core_types;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, Result, SeatingError};
pub use model::{
    Guest, GuestFilter, GuestId, GuestUpdate, NewGuest, NewTable, OccupiedTable, Seating, Table,
    TableId, TableUpdate,
};
pub use ops::MemoryStore;
pub use repository::{
    ClaimOutcome, GuestStore, SeatingClaim, SeatingStore, StoreResult, TableStore, WriteOutcome,
};
