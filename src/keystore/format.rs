// src/keystore/format.rs
//! On-disk keystore envelope
//!
//! ```json
//! {
//!   "format": "cryptolog-keystore",
//!   "version": 1,
//!   "crypto": { "kdf": {..}, "cipher": {..}, "ciphertext": "<base64>" }
//! }
//! ```
//!
//! `crypto` is a [`SealedBlob`] over the JSON-encoded entry map, sealed with
//! the store password.

use serde::{Deserialize, Serialize};

use super::KeystoreContents;
use crate::consts::{KEYSTORE_FORMAT, KEYSTORE_VERSION};
use crate::core::{SealError, SealedBlob};
use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeystoreEnvelope {
    pub format: String,
    pub version: u32,
    pub crypto: SealedBlob,
}

impl KeystoreEnvelope {
    pub(crate) fn seal(
        contents: &KeystoreContents,
        store_password: &[u8],
        kdf_iterations: u32,
    ) -> Result<Self, CoreError> {
        let payload = serde_json::to_vec(contents)?;
        Ok(Self {
            format: KEYSTORE_FORMAT.to_string(),
            version: KEYSTORE_VERSION,
            crypto: SealedBlob::seal(&payload, store_password, kdf_iterations)?,
        })
    }

    /// Parse raw file bytes; anything that is not an envelope is corrupt
    pub fn parse(bytes: &[u8]) -> Result<Self, CoreError> {
        let envelope: Self = serde_json::from_slice(bytes)
            .map_err(|e| CoreError::KeystoreCorrupt(format!("not a keystore envelope: {e}")))?;
        if envelope.format != KEYSTORE_FORMAT {
            return Err(CoreError::KeystoreCorrupt(format!(
                "unexpected format tag '{}'",
                envelope.format
            )));
        }
        if envelope.version != KEYSTORE_VERSION {
            return Err(CoreError::UnsupportedAlgorithm(format!(
                "keystore version {}",
                envelope.version
            )));
        }
        Ok(envelope)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Iterations recorded for the store-password derivation
    pub fn kdf_iterations(&self) -> u32 {
        self.crypto.kdf.iterations
    }

    pub(crate) fn open(&self, store_password: &[u8]) -> Result<KeystoreContents, CoreError> {
        let payload = self.crypto.open(store_password).map_err(|e| match e {
            SealError::Authentication => CoreError::KeystorePassword,
            SealError::Malformed(msg) => CoreError::KeystoreCorrupt(msg),
            SealError::Unsupported(what) => CoreError::UnsupportedAlgorithm(what),
        })?;
        serde_json::from_slice(payload.expose_secret())
            .map_err(|e| CoreError::KeystoreCorrupt(format!("undecodable entries: {e}")))
    }
}
