//! Error handling for seatplan-store
//!
//! Wraps seatplan-core ExError with store-specific helpers

use rusqlite::ErrorCode;
use seatplan_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::ConstraintViolation)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a database error from rusqlite::Error
///
/// A busy or locked database becomes `Timeout`; constraint failures keep
/// their own kind; everything else is `Persistence`.
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    let kind = match &err {
        rusqlite::Error::SqliteFailure(e, _) => match e.code {
            ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => ExErrorKind::Timeout,
            ErrorCode::ConstraintViolation => ExErrorKind::ConstraintViolation,
            _ => ExErrorKind::Persistence,
        },
        _ => ExErrorKind::Persistence,
    };
    ExError::new(kind)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an error for a stored value that cannot be decoded
pub fn corrupt_row(table: &str, id: i64, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite_decode")
        .with_entity_id(id)
        .with_message(format!("Invalid row in {}: {}", table, reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(code: std::os::raw::c_int) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(code), None)
    }

    #[test]
    fn test_busy_maps_to_timeout() {
        let err = from_rusqlite(failure(rusqlite::ffi::SQLITE_BUSY));
        assert_eq!(err.kind(), ExErrorKind::Timeout);
        assert_eq!(err.op(), Some("sqlite"));
    }

    #[test]
    fn test_constraint_maps_to_constraint_violation() {
        let err = from_rusqlite(failure(rusqlite::ffi::SQLITE_CONSTRAINT));
        assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
    }

    #[test]
    fn test_other_errors_are_persistence() {
        let err = from_rusqlite(rusqlite::Error::QueryReturnedNoRows);
        assert_eq!(err.kind(), ExErrorKind::Persistence);
    }
}
