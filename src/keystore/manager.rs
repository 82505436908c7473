// src/keystore/manager.rs
//! Keystore file lifecycle
//!
//! The manager knows where the keystore lives and how hard its passwords are
//! stretched. It never keeps an unlocked keystore itself; callers get a
//! [`Keystore`] handle and hand it back to [`KeyStoreManager::persist`].

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::format::KeystoreEnvelope;
use super::{Keystore, KeystoreContents};
use crate::aliases::StorePassword;
use crate::config::Config;
use crate::consts::{DEFAULT_KDF_ITERATIONS, DEFAULT_KEYSTORE_FILE};
use crate::error::{CoreError, Result};

/// Owns one keystore file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStoreManager {
    path: PathBuf,
    kdf_iterations: u32,
}

impl Default for KeyStoreManager {
    fn default() -> Self {
        Self::new(DEFAULT_KEYSTORE_FILE)
    }
}

impl KeyStoreManager {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            kdf_iterations: DEFAULT_KDF_ITERATIONS,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.paths.keystore.clone())
            .with_kdf_iterations(config.security.kdf_iterations)
    }

    /// PBKDF2 rounds for newly sealed data; zero is clamped to one
    pub fn with_kdf_iterations(mut self, iterations: u32) -> Self {
        self.kdf_iterations = iterations.max(1);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kdf_iterations(&self) -> u32 {
        self.kdf_iterations
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Unlock the keystore, creating an empty one on disk if none exists yet
    pub fn open_or_create(&self, store_password: &StorePassword) -> Result<Keystore> {
        match fs::read(&self.path) {
            Ok(bytes) => self.unlock(&bytes, store_password),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "creating new keystore");
                let keystore =
                    Keystore::from_contents(KeystoreContents::default(), self.kdf_iterations);
                self.persist(&keystore, store_password)?;
                Ok(keystore)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Unlock an existing keystore; a missing file is an I/O `NotFound` error
    /// and nothing is created
    pub fn open(&self, store_password: &StorePassword) -> Result<Keystore> {
        let bytes = fs::read(&self.path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                CoreError::Io(std::io::Error::new(
                    ErrorKind::NotFound,
                    format!("no keystore at {}", self.path.display()),
                ))
            } else {
                e.into()
            }
        })?;
        self.unlock(&bytes, store_password)
    }

    fn unlock(&self, bytes: &[u8], store_password: &StorePassword) -> Result<Keystore> {
        let envelope = KeystoreEnvelope::parse(bytes)?;
        let contents = envelope.open(store_password.expose_secret().as_bytes())?;
        debug!(
            path = %self.path.display(),
            entries = contents.entries.len(),
            "keystore unlocked"
        );
        Ok(Keystore::from_contents(contents, self.kdf_iterations))
    }

    /// Seal `keystore` with `store_password` and atomically replace the file
    pub fn persist(&self, keystore: &Keystore, store_password: &StorePassword) -> Result<()> {
        let envelope = KeystoreEnvelope::seal(
            &keystore.to_contents(),
            store_password.expose_secret().as_bytes(),
            self.kdf_iterations,
        )?;
        let bytes = envelope.to_bytes()?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        // NamedTempFile is created 0600 on Unix
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "keystore persisted");
        Ok(())
    }

    /// Re-seal the keystore under a new store password
    ///
    /// Entries keep their own key passwords.
    pub fn change_password(&self, old: &StorePassword, new: &StorePassword) -> Result<()> {
        let keystore = self.open(old)?;
        self.persist(&keystore, new)?;
        info!(path = %self.path.display(), "keystore password changed");
        Ok(())
    }
}
