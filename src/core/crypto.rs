// src/core/crypto.rs
//! File cipher: pure in-memory AES-128-GCM transforms
//!
//! Layout of an encrypted payload:
//!
//! ```text
//! "CLG" | version (1 byte) | nonce (12 bytes) | ciphertext | tag (16 bytes)
//! ```
//!
//! The 4-byte header is authenticated as associated data, so a payload whose
//! header was edited fails the same way as one encrypted under another key.

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes128Gcm, Nonce};
use secure_gate::Dynamic;

use crate::aliases::{CypherText, PlainText, SecretKey};
use crate::consts::{
    CRYPTOLOG_FORMAT_VERSION, CRYPTOLOG_HEADER_LEN, CRYPTOLOG_MAGIC, NONCE_LENGTH, TAG_LENGTH,
};
use crate::core::util::fill_random;
use crate::enums::CipherMode;
use crate::error::CoreError;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Smallest well-formed payload: header, nonce and tag around an empty message
pub const MIN_CIPHERTEXT_LEN: usize = CRYPTOLOG_HEADER_LEN + NONCE_LENGTH + TAG_LENGTH;

fn header() -> [u8; CRYPTOLOG_HEADER_LEN] {
    let [a, b, c] = *CRYPTOLOG_MAGIC;
    [a, b, c, CRYPTOLOG_FORMAT_VERSION]
}

fn aes(key: &SecretKey) -> Result<Aes128Gcm> {
    Aes128Gcm::new_from_slice(key.expose_secret())
        .map_err(|e| CoreError::UnsupportedAlgorithm(format!("AES-128 key setup: {e}")))
}

/// Encrypt plaintext in memory → framed AES-128-GCM payload
pub fn encrypt_to_vec(plaintext: &[u8], key: &SecretKey) -> Result<CypherText> {
    let header = header();
    let mut nonce = [0u8; NONCE_LENGTH];
    fill_random(&mut nonce)?;

    let sealed = aes(key)?
        .encrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: plaintext,
                aad: &header,
            },
        )
        .map_err(|_| CoreError::UnsupportedAlgorithm("AES-128-GCM encryption failed".into()))?;

    let mut out = Vec::with_capacity(MIN_CIPHERTEXT_LEN + plaintext.len());
    out.extend_from_slice(&header);
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&sealed);
    Ok(CypherText::new(out))
}

/// Decrypt a framed payload in memory → plaintext
pub fn decrypt_to_vec(ciphertext: &[u8], key: &SecretKey) -> Result<PlainText> {
    if ciphertext.len() < MIN_CIPHERTEXT_LEN || !is_cryptolog_file(ciphertext) {
        return Err(CoreError::CiphertextIntegrity);
    }
    let (header, rest) = ciphertext.split_at(CRYPTOLOG_HEADER_LEN);
    if header[3] != CRYPTOLOG_FORMAT_VERSION {
        return Err(CoreError::UnsupportedAlgorithm(format!(
            "encrypted file format version {}",
            header[3]
        )));
    }
    let (nonce, sealed) = rest.split_at(NONCE_LENGTH);

    let plaintext = aes(key)?
        .decrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: sealed,
                aad: header,
            },
        )
        .map_err(|_| CoreError::CiphertextIntegrity)?;
    Ok(PlainText::new(plaintext))
}

/// Apply the cipher in the requested direction
///
/// The output stays inside a zeroize-on-drop buffer whichever way it goes.
pub fn transform(mode: CipherMode, key: &SecretKey, input: &[u8]) -> Result<Dynamic<Vec<u8>>> {
    match mode {
        CipherMode::Encrypt => encrypt_to_vec(input, key),
        CipherMode::Decrypt => decrypt_to_vec(input, key),
    }
}

/// Check if data starts with the cryptolog magic (any version)
pub fn is_cryptolog_file(data: &[u8]) -> bool {
    data.starts_with(CRYPTOLOG_MAGIC)
}

/// Get the format version from a header, if the magic matches
pub fn format_version(data: &[u8]) -> Option<u8> {
    if is_cryptolog_file(data) {
        data.get(3).copied()
    } else {
        None
    }
}
