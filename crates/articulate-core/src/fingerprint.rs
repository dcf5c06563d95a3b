//! SHA-256 fingerprints of canonical trees
//!
//! The hash is computed over the canonical JSON serialization, so two trees
//! hash equally exactly when they are structurally equal. Useful as a cache
//! key or for detecting that an agreement refresh changed nothing.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::{CollegeArticulation, Group, Result};

/// Hex SHA-256 of one canonical group
pub fn group_hash(group: &Group) -> Result<String> {
    digest(group)
}

/// Hex SHA-256 of a course's full college list
pub fn articulations_hash(colleges: &[CollegeArticulation]) -> Result<String> {
    digest(colleges)
}

fn digest<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let canonical = serde_json::to_string(value)?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}
