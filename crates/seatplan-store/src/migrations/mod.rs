//! Migration framework
//!
//! - Embedded SQL migrations
//! - Idempotent application, recorded in `schema_version`
//! - SHA-256 checksums to detect edited migrations

mod checksums;
mod embedded;
mod runner;

pub use checksums::compute_checksum;
pub use embedded::{get_migrations, Migration};
pub use runner::apply_migrations;
