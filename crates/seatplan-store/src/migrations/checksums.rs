//! SHA-256 checksums of migration SQL

use sha2::{Digest, Sha256};

/// Compute SHA-256 checksum of a string, hex encoded
pub fn compute_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
