// src/keystore/mod.rs
//! Password-protected keystore
//!
//! A keystore is a single file holding named AES keys. Two passwords are in
//! play: the *store password* seals the file as a whole, and each entry is
//! additionally sealed with its own *key password*.
//!
//! - [`KeyStoreManager`] owns the file: open-or-create, persist, re-key.
//! - [`Keystore`] is the unlocked in-memory handle; its registry operations
//!   (`store`, `retrieve`, ...) live in `registry.rs`.
//! - `format.rs` describes the on-disk envelope.

mod format;
mod manager;
mod registry;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::SealedBlob;

pub use format::KeystoreEnvelope;
pub use manager::KeyStoreManager;
pub use registry::normalize_alias;

/// One sealed key inside a keystore
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEntry {
    pub created_at: DateTime<Utc>,
    /// BLAKE3 prefix of the key, for listings
    pub fingerprint: String,
    /// The key sealed with its key password
    pub sealed: SealedBlob,
}

/// Unsealed listing information about an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    pub alias: String,
    pub fingerprint: String,
    pub created_at: DateTime<Utc>,
}

/// The decrypted keystore payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct KeystoreContents {
    #[serde(default)]
    pub entries: BTreeMap<String, KeyEntry>,
}

/// Unlocked keystore handle
///
/// Mutations are in-memory only until [`KeyStoreManager::persist`] runs.
#[derive(Debug, Clone)]
pub struct Keystore {
    entries: BTreeMap<String, KeyEntry>,
    /// PBKDF2 rounds for entries sealed through this handle
    kdf_iterations: u32,
}

impl Keystore {
    pub(crate) fn from_contents(contents: KeystoreContents, kdf_iterations: u32) -> Self {
        Self {
            entries: contents.entries,
            kdf_iterations,
        }
    }

    pub(crate) fn to_contents(&self) -> KeystoreContents {
        KeystoreContents {
            entries: self.entries.clone(),
        }
    }

    pub fn kdf_iterations(&self) -> u32 {
        self.kdf_iterations
    }
}

impl PartialEq for Keystore {
    /// Two handles are equal when they hold the same entries
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}
