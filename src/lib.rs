// src/lib.rs
//! cryptolog: password-protected AES keystore and file encryption
//!
//! Features:
//! - Keystore file sealed with a store password (PBKDF2-HMAC-SHA256 + AES-128-GCM)
//! - Per-key passwords, aliases, atomic persistence
//! - Whole-file AES-128-GCM encryption with authenticated header
//! - Typed errors that separate password mistakes from corruption and
//!   environment defects

pub mod aliases;
pub mod config;
pub mod consts;
pub mod core;
pub mod enums;
pub mod error;
pub mod file_ops;
pub mod keystore;
pub mod workflow;

// Re-export everything users need at the crate root
pub use aliases::{KeyPassword, SecretKey, StorePassword};
pub use config::{load as load_config, Config};
pub use enums::CipherMode;
pub use error::{CoreError, Result as CoreResult};
pub use keystore::{KeyInfo, KeyStoreManager, Keystore};
pub use workflow::{
    decrypt, encrypt, CryptoRequest, CryptoWorkflow, WorkflowOutcome, WorkflowState,
};
