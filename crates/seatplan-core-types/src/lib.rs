//! Core types shared across SeatPlan facilities
//!
//! - **Correlation types**: RequestId for tagging one request's log events
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::RequestId;
