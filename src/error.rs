// src/error.rs
//! Public error type for the entire crate

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    /// Wrong store password, or the keystore failed its integrity check
    #[error("keystore password is incorrect or the keystore was tampered with")]
    KeystorePassword,

    /// The keystore file exists but is not a readable keystore
    #[error("keystore file is corrupt: {0}")]
    KeystoreCorrupt(String),

    #[error("key password is incorrect for alias '{0}'")]
    KeyPassword(String),

    #[error("no key stored under alias '{0}'")]
    AliasNotFound(String),

    #[error("invalid alias: {0:?}")]
    InvalidAlias(String),

    /// Environment or file declares something this build cannot do
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("ciphertext failed integrity verification (wrong key or damaged file)")]
    CiphertextIntegrity,

    #[error("cannot derive an output name for {}: expected a '.encrypted' suffix", .0.display())]
    UnmarkedInput(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// True when the caller should ask for a different password
    pub fn is_password_error(&self) -> bool {
        matches!(self, CoreError::KeystorePassword | CoreError::KeyPassword(_))
    }

    /// True for environment defects that no user input can fix
    pub fn is_environment_error(&self) -> bool {
        matches!(self, CoreError::UnsupportedAlgorithm(_))
    }
}
