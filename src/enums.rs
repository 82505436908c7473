// src/enums.rs
//! Public enum types used throughout the crate
//!
//! Central location for the user-visible choices: cipher direction and the
//! algorithms a keystore or encrypted file may declare.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction of a cipher operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CipherMode {
    Encrypt,
    Decrypt,
}

impl fmt::Display for CipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CipherMode::Encrypt => f.write_str("encrypt"),
            CipherMode::Decrypt => f.write_str("decrypt"),
        }
    }
}

/// Password-based key derivation functions understood by the keystore
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum KdfAlgorithm {
    #[default]
    Pbkdf2HmacSha256,
}

impl KdfAlgorithm {
    pub const fn name(self) -> &'static str {
        match self {
            KdfAlgorithm::Pbkdf2HmacSha256 => "pbkdf2-hmac-sha256",
        }
    }

    /// Resolve the identifier stored in a keystore file
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pbkdf2-hmac-sha256" => Some(KdfAlgorithm::Pbkdf2HmacSha256),
            _ => None,
        }
    }
}

/// Symmetric ciphers used for sealed blobs and file payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum CipherAlgorithm {
    #[default]
    Aes128Gcm,
    // Future:
    // Aes256Gcm,
    // XChaCha20Poly1305,
}

impl CipherAlgorithm {
    pub const fn name(self) -> &'static str {
        match self {
            CipherAlgorithm::Aes128Gcm => "aes-128-gcm",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "aes-128-gcm" => Some(CipherAlgorithm::Aes128Gcm),
            _ => None,
        }
    }
}
