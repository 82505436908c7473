// src/core/key.rs
//! Key generation and fingerprints
//!
//! Keys are 128-bit AES keys drawn from the OS CSPRNG. The fingerprint is a
//! short BLAKE3 prefix shown when listing keystore entries.

use crate::aliases::SecretKey;
use crate::consts::{FINGERPRINT_LENGTH_HEX, KEY_LENGTH};
use crate::core::util::{blake3_hex, fill_random};
use crate::error::CoreError;

/// Generate a new random 128-bit file key
pub fn generate_key() -> Result<SecretKey, CoreError> {
    let mut bytes = [0u8; KEY_LENGTH];
    fill_random(&mut bytes)?;
    Ok(SecretKey::new(bytes))
}

/// Rebuild a key from unsealed bytes; `None` if the length is wrong
pub fn key_from_slice(bytes: &[u8]) -> Option<SecretKey> {
    let arr: [u8; KEY_LENGTH] = bytes.try_into().ok()?;
    Some(SecretKey::new(arr))
}

/// Display fingerprint of a key
pub fn fingerprint(key: &SecretKey) -> String {
    let mut hex = blake3_hex(key.expose_secret());
    hex.truncate(FINGERPRINT_LENGTH_HEX);
    hex
}
