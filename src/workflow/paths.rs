// src/workflow/paths.rs
//! Output file naming
//!
//! Encrypting appends `.encrypted`. Decrypting strips it and inserts
//! `.decrypted` before the remaining extension:
//!
//! ```text
//! a.report.pdf            -> a.report.pdf.encrypted
//! a.report.pdf.encrypted  -> a.report.decrypted.pdf
//! README.encrypted        -> README.decrypted
//! ```
//!
//! Only the file name is inspected; dots in directory names never count.
//! Names are handled as `OsStr`, so anything that encrypts also decrypts.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::consts::{DECRYPTED_MARKER, ENCRYPTED_EXTENSION, ENCRYPTED_SUFFIX};
use crate::error::{CoreError, Result};

/// `<input>.encrypted`
pub fn encrypted_output_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(ENCRYPTED_SUFFIX);
    PathBuf::from(name)
}

/// File name with `.encrypted` removed, if the path carries it
///
/// `.encrypted` on its own is a hidden file without an extension, not a
/// marked one.
fn original_name(path: &Path) -> Option<&OsStr> {
    if path.extension()? != ENCRYPTED_EXTENSION {
        return None;
    }
    path.file_stem()
}

/// Derive the plaintext destination for an encrypted input
///
/// Fails with [`CoreError::UnmarkedInput`] when the file name does not end in
/// `.encrypted` or nothing precedes the suffix.
pub fn decrypted_output_path(input: &Path) -> Result<PathBuf> {
    let original = original_name(input)
        .map(Path::new)
        .ok_or_else(|| CoreError::UnmarkedInput(input.to_path_buf()))?;

    let mut name = OsString::new();
    match (original.file_stem(), original.extension()) {
        (Some(stem), Some(ext)) => {
            name.push(stem);
            name.push(".");
            name.push(DECRYPTED_MARKER);
            name.push(".");
            name.push(ext);
        }
        // No extension to keep: README, .bashrc
        _ => {
            name.push(original.as_os_str());
            name.push(".");
            name.push(DECRYPTED_MARKER);
        }
    }

    Ok(input.with_file_name(name))
}

/// True if `path` carries the `.encrypted` suffix
pub fn is_encrypted_name(path: &Path) -> bool {
    original_name(path).is_some()
}
