// src/core/util.rs
//! Small utility functions used across the core module
//!
//! Hashing and randomness helpers.

use blake3::Hasher;

use crate::error::CoreError;

/// Compute BLAKE3 hash and return as lowercase hex string
pub fn blake3_hex(data: &[u8]) -> String {
    Hasher::new().update(data).finalize().to_hex().to_string()
}

/// Fill `buf` from the operating system's CSPRNG
///
/// A missing entropy source is an environment defect, not a user error.
pub fn fill_random(buf: &mut [u8]) -> Result<(), CoreError> {
    use rand::rngs::OsRng;
    use rand::TryRngCore;

    OsRng.try_fill_bytes(buf).map_err(|e| {
        CoreError::UnsupportedAlgorithm(format!("system random number generator unavailable: {e}"))
    })
}
