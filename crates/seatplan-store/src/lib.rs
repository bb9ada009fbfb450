//! SeatPlan Store - SQLite persistence for guests and tables
//!
//! Provides:
//! - Connection setup (foreign keys, WAL, busy timeout)
//! - Embedded migrations with checksums
//! - `SqliteStore`, implementing the seatplan-core store traits

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

pub use errors::Result;
pub use repo::SqliteStore;
