// src/file_ops.rs
//! File-level encryption/decryption
//!
//! Builds on the in-memory cipher in `core::crypto`. Each file is read in one
//! call and written in one call; both the input and the output buffers live in
//! zeroize-on-drop secrets for the whole operation.

use std::fs;
use std::path::Path;

use secure_gate::Dynamic;
use tracing::debug;

use crate::aliases::SecretKey;
use crate::core::crypto::transform;
use crate::enums::CipherMode;
use crate::error::CoreError;

/// Read `input_path`, transform it, write `output_path`
///
/// Nothing is written unless the transform succeeded, so a wrong key never
/// leaves a partial output file behind. Returns the number of bytes written.
pub fn transform_file<P: AsRef<Path>, Q: AsRef<Path>>(
    mode: CipherMode,
    key: &SecretKey,
    input_path: P,
    output_path: Q,
) -> Result<u64, CoreError> {
    let input: Dynamic<Vec<u8>> = Dynamic::new(fs::read(input_path.as_ref())?);
    let output = transform(mode, key, input.expose_secret())?;
    fs::write(output_path.as_ref(), output.expose_secret())?;

    let written = output.expose_secret().len() as u64;
    debug!(
        %mode,
        input = %input_path.as_ref().display(),
        output = %output_path.as_ref().display(),
        bytes = written,
        "file transformed"
    );
    Ok(written)
}
