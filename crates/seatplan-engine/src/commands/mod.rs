//! Command orchestration layer.
//!
//! ## Logging
//!
//! Each public operation owns its log boundary:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Store adapters use only `tracing::debug!()` for internal details.

pub mod engine_command;
pub mod seating;
