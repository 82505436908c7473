// src/core/seal.rs
//! Password sealing, the primitive behind both keystore layers
//!
//! A [`SealedBlob`] is a self-describing record of a PBKDF2-HMAC-SHA256
//! derivation (function, iterations, salt) and an AES-128-GCM encryption
//! (function, nonce, ciphertext + tag). The store password seals the whole
//! keystore payload; each key password seals a single key.
//!
//! The GCM tag doubles as the password check: a wrong password derives a
//! different wrapping key and fails authentication exactly like a tampered
//! ciphertext would.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes128Gcm, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::aliases::{PlainText, WrappingKey};
use crate::consts::{KEY_LENGTH, NONCE_LENGTH, SALT_LENGTH, TAG_LENGTH};
use crate::core::util::fill_random;
use crate::enums::{CipherAlgorithm, KdfAlgorithm};
use crate::error::CoreError;

/// Why a sealed blob could not be opened
///
/// Callers translate this into the password error of their own layer.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SealError {
    /// Wrong password or modified ciphertext
    #[error("authentication failed")]
    Authentication,

    #[error("malformed sealed blob: {0}")]
    Malformed(String),

    #[error("unsupported {0}")]
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfSpec {
    pub function: String,
    pub iterations: u32,
    /// Salt as hex
    pub salt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherSpec {
    pub function: String,
    /// Nonce as hex
    pub nonce: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedBlob {
    pub kdf: KdfSpec,
    pub cipher: CipherSpec,
    /// Ciphertext with appended GCM tag, base64
    pub ciphertext: String,
}

/// PBKDF2-HMAC-SHA256 → 128-bit wrapping key
pub fn derive_wrapping_key(password: &[u8], salt: &[u8], iterations: u32) -> WrappingKey {
    let mut out = [0u8; KEY_LENGTH];
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut out);
    WrappingKey::new(out)
}

impl SealedBlob {
    /// Seal `plaintext` under `password` with a fresh salt and nonce
    pub fn seal(plaintext: &[u8], password: &[u8], iterations: u32) -> Result<Self, CoreError> {
        let mut salt = [0u8; SALT_LENGTH];
        let mut nonce = [0u8; NONCE_LENGTH];
        fill_random(&mut salt)?;
        fill_random(&mut nonce)?;

        let key = derive_wrapping_key(password, &salt, iterations);
        let cipher = Aes128Gcm::new_from_slice(key.expose_secret())
            .map_err(|e| CoreError::UnsupportedAlgorithm(format!("AES-128 key setup: {e}")))?;
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| CoreError::UnsupportedAlgorithm("AES-128-GCM encryption failed".into()))?;

        Ok(Self {
            kdf: KdfSpec {
                function: KdfAlgorithm::Pbkdf2HmacSha256.name().to_string(),
                iterations,
                salt: hex::encode(salt),
            },
            cipher: CipherSpec {
                function: CipherAlgorithm::Aes128Gcm.name().to_string(),
                nonce: hex::encode(nonce),
            },
            ciphertext: STANDARD.encode(ciphertext),
        })
    }

    /// Derive the wrapping key from `password` and decrypt
    pub fn open(&self, password: &[u8]) -> Result<PlainText, SealError> {
        KdfAlgorithm::from_name(&self.kdf.function)
            .ok_or_else(|| SealError::Unsupported(format!("KDF '{}'", self.kdf.function)))?;
        CipherAlgorithm::from_name(&self.cipher.function)
            .ok_or_else(|| SealError::Unsupported(format!("cipher '{}'", self.cipher.function)))?;

        if self.kdf.iterations == 0 {
            return Err(SealError::Malformed("zero KDF iterations".into()));
        }
        let salt = hex::decode(&self.kdf.salt)
            .map_err(|e| SealError::Malformed(format!("salt: {e}")))?;
        let nonce = hex::decode(&self.cipher.nonce)
            .map_err(|e| SealError::Malformed(format!("nonce: {e}")))?;
        if nonce.len() != NONCE_LENGTH {
            return Err(SealError::Malformed(format!(
                "nonce must be {NONCE_LENGTH} bytes, got {}",
                nonce.len()
            )));
        }
        let ciphertext = STANDARD
            .decode(&self.ciphertext)
            .map_err(|e| SealError::Malformed(format!("ciphertext: {e}")))?;
        if ciphertext.len() < TAG_LENGTH {
            return Err(SealError::Malformed("ciphertext shorter than tag".into()));
        }

        let key = derive_wrapping_key(password, &salt, self.kdf.iterations);
        let cipher = Aes128Gcm::new_from_slice(key.expose_secret())
            .map_err(|e| SealError::Unsupported(format!("AES-128 key setup: {e}")))?;
        let plaintext = cipher
            .decrypt(Nonce::from_slice(&nonce), ciphertext.as_slice())
            .map_err(|_| SealError::Authentication)?;

        Ok(PlainText::new(plaintext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ITERATIONS: u32 = 1_000;

    #[test]
    fn test_seal_open_roundtrip() {
        let blob = SealedBlob::seal(b"payload", b"hunter2", ITERATIONS).unwrap();
        let opened = blob.open(b"hunter2").unwrap();
        assert_eq!(opened.expose_secret().as_slice(), b"payload");
    }

    #[test]
    fn test_wrong_password_is_authentication_error() {
        let blob = SealedBlob::seal(b"payload", b"right", ITERATIONS).unwrap();
        assert_eq!(blob.open(b"wrong").unwrap_err(), SealError::Authentication);
    }

    #[test]
    fn test_each_seal_uses_fresh_salt_and_nonce() {
        let a = SealedBlob::seal(b"same", b"pw", ITERATIONS).unwrap();
        let b = SealedBlob::seal(b"same", b"pw", ITERATIONS).unwrap();
        assert_ne!(a.kdf.salt, b.kdf.salt);
        assert_ne!(a.cipher.nonce, b.cipher.nonce);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn test_unknown_kdf_is_unsupported() {
        let mut blob = SealedBlob::seal(b"x", b"pw", ITERATIONS).unwrap();
        blob.kdf.function = "argon2id".into();
        assert!(matches!(blob.open(b"pw"), Err(SealError::Unsupported(_))));
    }

    #[test]
    fn test_bad_nonce_is_malformed() {
        let mut blob = SealedBlob::seal(b"x", b"pw", ITERATIONS).unwrap();
        blob.cipher.nonce = "abcd".into();
        assert!(matches!(blob.open(b"pw"), Err(SealError::Malformed(_))));
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let a = derive_wrapping_key(b"pw", &[7; SALT_LENGTH], ITERATIONS);
        let b = derive_wrapping_key(b"pw", &[7; SALT_LENGTH], ITERATIONS);
        let c = derive_wrapping_key(b"pw", &[8; SALT_LENGTH], ITERATIONS);
        assert_eq!(a.expose_secret(), b.expose_secret());
        assert_ne!(a.expose_secret(), c.expose_secret());
    }
}
