use crate::errors::{Result, SeatingError};

/// Reject empty or whitespace-only guest names
///
/// # Errors
/// * `InvalidName` - If the name has no visible characters
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(SeatingError::InvalidName {
            reason: "Name cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Reject tables without a single seat
///
/// # Errors
/// * `InvalidCapacity` - If capacity is zero
pub fn validate_capacity(capacity: u32) -> Result<()> {
    if capacity == 0 {
        return Err(SeatingError::InvalidCapacity { capacity });
    }
    Ok(())
}
