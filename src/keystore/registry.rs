// src/keystore/registry.rs
//! Key registry operations on an unlocked keystore handle
//!
//! Aliases are normalized before every lookup, so callers may pass them in
//! any case.

use chrono::Utc;
use tracing::debug;

use super::{KeyEntry, KeyInfo, Keystore};
use crate::aliases::{KeyPassword, SecretKey};
use crate::core::key::{fingerprint, key_from_slice};
use crate::core::SealedBlob;
use crate::error::{CoreError, Result};

/// Aliases are case-insensitive; stored and matched in lowercase
pub fn normalize_alias(alias: &str) -> Result<String> {
    if alias.trim().is_empty() {
        return Err(CoreError::InvalidAlias(alias.to_string()));
    }
    Ok(alias.to_ascii_lowercase())
}

impl Keystore {
    /// Seal `key` with `key_password` and insert it under `alias`
    ///
    /// An existing entry with the same alias is replaced. Nothing is written
    /// to disk; call `KeyStoreManager::persist` afterwards.
    pub fn store(
        &mut self,
        alias: &str,
        key: &SecretKey,
        key_password: &KeyPassword,
    ) -> Result<()> {
        let alias = normalize_alias(alias)?;
        let sealed = SealedBlob::seal(
            key.expose_secret(),
            key_password.expose_secret().as_bytes(),
            self.kdf_iterations,
        )?;
        let entry = KeyEntry {
            created_at: Utc::now(),
            fingerprint: fingerprint(key),
            sealed,
        };
        if self.entries.insert(alias.clone(), entry).is_some() {
            debug!(%alias, "replaced existing key entry");
        } else {
            debug!(%alias, "added key entry");
        }
        Ok(())
    }

    /// Unseal the key stored under `alias`
    pub fn retrieve(&self, alias: &str, key_password: &KeyPassword) -> Result<SecretKey> {
        let alias = normalize_alias(alias)?;
        let entry = self
            .entries
            .get(&alias)
            .ok_or_else(|| CoreError::AliasNotFound(alias.clone()))?;

        // Any failure to unseal an existing entry is reported as a key password problem
        let bytes = entry
            .sealed
            .open(key_password.expose_secret().as_bytes())
            .map_err(|e| {
                debug!(%alias, error = %e, "key entry did not unseal");
                CoreError::KeyPassword(alias.clone())
            })?;
        key_from_slice(bytes.expose_secret()).ok_or(CoreError::KeyPassword(alias))
    }

    pub fn contains(&self, alias: &str) -> bool {
        normalize_alias(alias).is_ok_and(|alias| self.entries.contains_key(&alias))
    }

    /// Drop an entry; returns whether one existed
    pub fn remove(&mut self, alias: &str) -> bool {
        match normalize_alias(alias) {
            Ok(alias) => self.entries.remove(&alias).is_some(),
            Err(_) => false,
        }
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Listing of all entries in alias order, without unsealing anything
    pub fn entries(&self) -> Vec<KeyInfo> {
        self.entries
            .iter()
            .map(|(alias, entry)| KeyInfo {
                alias: alias.clone(),
                fingerprint: entry.fingerprint.clone(),
                created_at: entry.created_at,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
