// src/workflow/mod.rs
//! Encrypt / decrypt orchestration
//!
//! A [`CryptoWorkflow`] drives one [`CryptoRequest`] through
//! `Idle → ResolvingKey → Transforming → Done | Failed`:
//!
//! - **encrypt**: generate a fresh key, store it in the keystore under the
//!   requested alias, persist the keystore, then encrypt the file to
//!   `<input>.encrypted`.
//! - **decrypt**: unlock the keystore, retrieve the key by alias, then decrypt
//!   the file to the derived `.decrypted` path.
//!
//! - **decrypt_many**: unlock once, then decrypt a batch of files with the
//!   same key, collecting per-file results.
//!
//! Side effects that happened before a failure (for example a keystore already
//! persisted with the new key) are not rolled back.

pub mod paths;

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::aliases::{KeyPassword, SecretKey, StorePassword};
use crate::config::Config;
use crate::core::key::{fingerprint, generate_key};
use crate::enums::CipherMode;
use crate::error::Result;
use crate::file_ops::transform_file;
use crate::keystore::KeyStoreManager;

pub use paths::{decrypted_output_path, encrypted_output_path, is_encrypted_name};

/// Inputs for one workflow run; never mutated once built
pub struct CryptoRequest {
    pub resource_path: PathBuf,
    pub alias: String,
    pub store_password: StorePassword,
    pub key_password: KeyPassword,
    pub direction: CipherMode,
}

impl CryptoRequest {
    pub fn new<P: Into<PathBuf>>(
        direction: CipherMode,
        resource_path: P,
        alias: &str,
        store_password: &str,
        key_password: &str,
    ) -> Self {
        Self {
            resource_path: resource_path.into(),
            alias: alias.to_string(),
            store_password: StorePassword::new(store_password.to_string()),
            key_password: KeyPassword::new(key_password.to_string()),
            direction,
        }
    }

    pub fn encrypt<P: Into<PathBuf>>(
        resource_path: P,
        alias: &str,
        store_password: &str,
        key_password: &str,
    ) -> Self {
        Self::new(
            CipherMode::Encrypt,
            resource_path,
            alias,
            store_password,
            key_password,
        )
    }

    pub fn decrypt<P: Into<PathBuf>>(
        resource_path: P,
        alias: &str,
        store_password: &str,
        key_password: &str,
    ) -> Self {
        Self::new(
            CipherMode::Decrypt,
            resource_path,
            alias,
            store_password,
            key_password,
        )
    }
}

impl fmt::Debug for CryptoRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoRequest")
            .field("resource_path", &self.resource_path)
            .field("alias", &self.alias)
            .field("store_password", &"[REDACTED]")
            .field("key_password", &"[REDACTED]")
            .field("direction", &self.direction)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    ResolvingKey,
    Transforming,
    Done,
    Failed,
}

/// What a successful run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowOutcome {
    pub direction: CipherMode,
    pub input: PathBuf,
    pub output: PathBuf,
    pub alias: String,
    pub bytes_written: u64,
}

/// Runs requests against one keystore
#[derive(Debug)]
pub struct CryptoWorkflow {
    manager: KeyStoreManager,
    state: WorkflowState,
}

impl CryptoWorkflow {
    pub fn new(manager: KeyStoreManager) -> Self {
        Self {
            manager,
            state: WorkflowState::Idle,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(KeyStoreManager::from_config(config))
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn manager(&self) -> &KeyStoreManager {
        &self.manager
    }

    /// Dispatch on `request.direction`
    pub fn run(&mut self, request: &CryptoRequest) -> Result<WorkflowOutcome> {
        self.execute(request.direction, request)
    }

    pub fn encrypt(&mut self, request: &CryptoRequest) -> Result<WorkflowOutcome> {
        self.execute(CipherMode::Encrypt, request)
    }

    pub fn decrypt(&mut self, request: &CryptoRequest) -> Result<WorkflowOutcome> {
        self.execute(CipherMode::Decrypt, request)
    }

    fn execute(&mut self, mode: CipherMode, request: &CryptoRequest) -> Result<WorkflowOutcome> {
        self.transition(WorkflowState::Idle);
        let result = match mode {
            CipherMode::Encrypt => self.encrypt_inner(request),
            CipherMode::Decrypt => self.decrypt_inner(request),
        };
        match &result {
            Ok(outcome) => {
                self.transition(WorkflowState::Done);
                info!(
                    direction = %outcome.direction,
                    alias = %outcome.alias,
                    output = %outcome.output.display(),
                    bytes = outcome.bytes_written,
                    "workflow complete"
                );
            }
            Err(e) => {
                self.transition(WorkflowState::Failed);
                warn!(direction = %mode, error = %e, "workflow failed");
            }
        }
        result
    }

    fn transition(&mut self, next: WorkflowState) {
        debug!(from = ?self.state, to = ?next, "workflow state");
        self.state = next;
    }

    fn encrypt_inner(&mut self, request: &CryptoRequest) -> Result<WorkflowOutcome> {
        let key = generate_key()?;

        self.transition(WorkflowState::ResolvingKey);
        let mut keystore = self.manager.open_or_create(&request.store_password)?;
        keystore.store(&request.alias, &key, &request.key_password)?;
        self.manager.persist(&keystore, &request.store_password)?;
        debug!(alias = %request.alias, fingerprint = %fingerprint(&key), "key stored");

        let output = encrypted_output_path(&request.resource_path);
        self.transform(CipherMode::Encrypt, request, &key, output)
    }

    fn decrypt_inner(&mut self, request: &CryptoRequest) -> Result<WorkflowOutcome> {
        let output = decrypted_output_path(&request.resource_path)?;

        self.transition(WorkflowState::ResolvingKey);
        let key = self.resolve_key(
            &request.alias,
            &request.store_password,
            &request.key_password,
        )?;

        self.transform(CipherMode::Decrypt, request, &key, output)
    }

    fn resolve_key(
        &self,
        alias: &str,
        store_password: &StorePassword,
        key_password: &KeyPassword,
    ) -> Result<SecretKey> {
        let keystore = self.manager.open_or_create(store_password)?;
        keystore.retrieve(alias, key_password)
    }

    /// Decrypt every `*.encrypted` path in `inputs` with one key
    ///
    /// The keystore is unlocked and the key unsealed once for the whole
    /// batch; failing that is the outer error. Per-file failures are
    /// collected and do not stop the batch. Paths without the `.encrypted`
    /// suffix are skipped.
    pub fn decrypt_many<'a, I>(
        &mut self,
        inputs: I,
        alias: &str,
        store_password: &str,
        key_password: &str,
    ) -> Result<Vec<(PathBuf, Result<WorkflowOutcome>)>>
    where
        I: IntoIterator<Item = &'a Path>,
    {
        self.transition(WorkflowState::Idle);
        let inputs: Vec<&Path> = inputs
            .into_iter()
            .filter(|path| is_encrypted_name(path))
            .collect();
        if inputs.is_empty() {
            self.transition(WorkflowState::Done);
            return Ok(Vec::new());
        }

        self.transition(WorkflowState::ResolvingKey);
        let store_password = StorePassword::new(store_password.to_string());
        let key_password = KeyPassword::new(key_password.to_string());
        let key = match self.resolve_key(alias, &store_password, &key_password) {
            Ok(key) => key,
            Err(e) => {
                self.transition(WorkflowState::Failed);
                warn!(%alias, error = %e, "batch could not unlock key");
                return Err(e);
            }
        };

        self.transition(WorkflowState::Transforming);
        let results: Vec<_> = inputs
            .into_iter()
            .map(|input| {
                let result = decrypt_one(&key, input, alias);
                if let Err(e) = &result {
                    warn!(input = %input.display(), error = %e, "batch entry failed");
                }
                (input.to_path_buf(), result)
            })
            .collect();

        let failed = results.iter().filter(|(_, r)| r.is_err()).count();
        self.transition(if failed == 0 {
            WorkflowState::Done
        } else {
            WorkflowState::Failed
        });
        info!(%alias, total = results.len(), failed, "batch decrypt complete");
        Ok(results)
    }

    fn transform(
        &mut self,
        mode: CipherMode,
        request: &CryptoRequest,
        key: &SecretKey,
        output: PathBuf,
    ) -> Result<WorkflowOutcome> {
        self.transition(WorkflowState::Transforming);
        let bytes_written = transform_file(mode, key, &request.resource_path, &output)?;
        Ok(WorkflowOutcome {
            direction: mode,
            input: request.resource_path.clone(),
            output,
            alias: request.alias.clone(),
            bytes_written,
        })
    }
}

/// Encrypt with the keystore named by the loaded configuration
pub fn encrypt(request: &CryptoRequest) -> Result<WorkflowOutcome> {
    CryptoWorkflow::from_config(&crate::config::load()?).encrypt(request)
}

/// Decrypt with the keystore named by the loaded configuration
pub fn decrypt(request: &CryptoRequest) -> Result<WorkflowOutcome> {
    CryptoWorkflow::from_config(&crate::config::load()?).decrypt(request)
}

fn decrypt_one(key: &SecretKey, input: &Path, alias: &str) -> Result<WorkflowOutcome> {
    let output = decrypted_output_path(input)?;
    let bytes_written = transform_file(CipherMode::Decrypt, key, input, &output)?;
    Ok(WorkflowOutcome {
        direction: CipherMode::Decrypt,
        input: input.to_path_buf(),
        output,
        alias: alias.to_string(),
        bytes_written,
    })
}
