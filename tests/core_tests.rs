// tests/core_tests.rs
mod common;

use std::fs;

use tempfile::tempdir;

use cryptolog::core::key::{fingerprint, generate_key, key_from_slice};
use cryptolog::core::util::blake3_hex;
use cryptolog::error::CoreError;
use cryptolog::file_ops::transform_file;
use cryptolog::{CipherMode, SecretKey};

#[test]
fn test_generate_key_is_random_and_16_bytes() {
    let key1 = generate_key().unwrap();
    let key2 = generate_key().unwrap();
    assert_eq!(key1.expose_secret().len(), 16);
    assert_ne!(key1.expose_secret(), key2.expose_secret());
}

#[test]
fn test_blake3_hex_is_64_chars_lowercase() {
    let hex = blake3_hex(b"hello world");
    assert_eq!(hex.len(), 64);
    assert!(hex
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
}

#[test]
fn test_fingerprint_is_stable_prefix() {
    let key = SecretKey::new([0x42; 16]);
    let fp = fingerprint(&key);
    assert_eq!(fp.len(), 16);
    assert_eq!(fp, fingerprint(&SecretKey::new([0x42; 16])));
    assert!(blake3_hex(&[0x42; 16]).starts_with(&fp));
}

#[test]
fn test_key_from_slice_checks_length() {
    assert!(key_from_slice(&[1; 16]).is_some());
    assert!(key_from_slice(&[1; 15]).is_none());
    assert!(key_from_slice(&[1; 32]).is_none());
}

#[test]
fn test_transform_file_roundtrip() {
    common::setup();
    let dir = tempdir().unwrap();
    let plain = dir.path().join("plain.txt");
    let enc = dir.path().join("plain.txt.encrypted");
    let dec = dir.path().join("plain.decrypted.txt");

    let data = b"The quick brown fox jumps over the lazy dog";
    fs::write(&plain, data).unwrap();
    let key = generate_key().unwrap();

    let written = transform_file(CipherMode::Encrypt, &key, &plain, &enc).unwrap();
    assert_eq!(written, fs::metadata(&enc).unwrap().len());
    assert!(written > data.len() as u64);

    let restored = transform_file(CipherMode::Decrypt, &key, &enc, &dec).unwrap();
    assert_eq!(restored, data.len() as u64);
    assert_eq!(fs::read(&dec).unwrap(), data);
}

#[test]
fn test_transform_file_with_wrong_key_writes_nothing() {
    let dir = tempdir().unwrap();
    let plain = dir.path().join("a.bin");
    let enc = dir.path().join("a.bin.encrypted");
    let dec = dir.path().join("a.decrypted.bin");
    fs::write(&plain, [7u8; 64]).unwrap();

    transform_file(CipherMode::Encrypt, &generate_key().unwrap(), &plain, &enc).unwrap();
    let result = transform_file(CipherMode::Decrypt, &generate_key().unwrap(), &enc, &dec);

    assert!(matches!(result, Err(CoreError::CiphertextIntegrity)));
    assert!(!dec.exists());
}

#[test]
fn test_transform_file_reports_missing_input_as_io() {
    let dir = tempdir().unwrap();
    let result = transform_file(
        CipherMode::Encrypt,
        &generate_key().unwrap(),
        dir.path().join("missing.txt"),
        dir.path().join("missing.txt.encrypted"),
    );
    assert!(matches!(result, Err(CoreError::Io(_))));
}
