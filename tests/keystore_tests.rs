// tests/keystore_tests.rs
mod common;

use std::fs;

use tempfile::tempdir;

use common::{key_password, keystore_path, manager, store_password, STORE_PASSWORD};
use cryptolog::core::key::generate_key;
use cryptolog::error::CoreError;
use cryptolog::keystore::KeystoreEnvelope;

#[test]
fn test_open_or_create_creates_empty_keystore_file() {
    common::setup();
    let dir = tempdir().unwrap();
    let manager = manager(dir.path());
    assert!(!manager.exists());

    let keystore = manager
        .open_or_create(&store_password(STORE_PASSWORD))
        .unwrap();

    assert!(keystore.is_empty());
    assert!(manager.exists());
    let envelope = KeystoreEnvelope::parse(&fs::read(manager.path()).unwrap()).unwrap();
    assert_eq!(envelope.format, "cryptolog-keystore");
    assert_eq!(envelope.kdf_iterations(), common::TEST_KDF_ITERATIONS);
}

#[test]
fn test_open_is_idempotent() {
    let dir = tempdir().unwrap();
    let manager = manager(dir.path());
    let pw = store_password(STORE_PASSWORD);

    let mut keystore = manager.open_or_create(&pw).unwrap();
    keystore
        .store("alpha", &generate_key().unwrap(), &key_password("a"))
        .unwrap();
    keystore
        .store("beta", &generate_key().unwrap(), &key_password("b"))
        .unwrap();
    manager.persist(&keystore, &pw).unwrap();

    let first = manager.open_or_create(&pw).unwrap();
    let second = manager.open_or_create(&pw).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.aliases().collect::<Vec<_>>(), vec!["alpha", "beta"]);
}

#[test]
fn test_wrong_store_password_is_rejected() {
    let dir = tempdir().unwrap();
    let manager = manager(dir.path());
    let mut keystore = manager
        .open_or_create(&store_password(STORE_PASSWORD))
        .unwrap();
    keystore
        .store("alpha", &generate_key().unwrap(), &key_password("a"))
        .unwrap();
    manager
        .persist(&keystore, &store_password(STORE_PASSWORD))
        .unwrap();

    let result = manager.open_or_create(&store_password("not the password"));
    assert!(matches!(result, Err(CoreError::KeystorePassword)));
    assert!(result.unwrap_err().is_password_error());
}

#[test]
fn test_wrong_password_on_fresh_empty_keystore_is_rejected() {
    let dir = tempdir().unwrap();
    let manager = manager(dir.path());
    manager
        .open_or_create(&store_password(STORE_PASSWORD))
        .unwrap();

    assert!(matches!(
        manager.open_or_create(&store_password("other")),
        Err(CoreError::KeystorePassword)
    ));
}

#[test]
fn test_garbage_file_is_corrupt_not_password_error() {
    let dir = tempdir().unwrap();
    fs::write(keystore_path(dir.path()), b"\x00\x01 definitely not json").unwrap();

    let result = manager(dir.path()).open_or_create(&store_password(STORE_PASSWORD));
    assert!(matches!(result, Err(CoreError::KeystoreCorrupt(_))));
}

#[test]
fn test_tampered_payload_fails_integrity_check() {
    let dir = tempdir().unwrap();
    let manager = manager(dir.path());
    let pw = store_password(STORE_PASSWORD);
    manager.open_or_create(&pw).unwrap();

    let mut envelope = KeystoreEnvelope::parse(&fs::read(manager.path()).unwrap()).unwrap();
    let mut ct = envelope.crypto.ciphertext.into_bytes();
    // flip one base64 character to another valid one
    ct[0] = if ct[0] == b'A' { b'B' } else { b'A' };
    envelope.crypto.ciphertext = String::from_utf8(ct).unwrap();
    fs::write(manager.path(), envelope.to_bytes().unwrap()).unwrap();

    assert!(matches!(
        manager.open_or_create(&pw),
        Err(CoreError::KeystorePassword)
    ));
}

#[test]
fn test_unknown_version_or_cipher_is_unsupported() {
    let dir = tempdir().unwrap();
    let manager = manager(dir.path());
    let pw = store_password(STORE_PASSWORD);
    manager.open_or_create(&pw).unwrap();
    let original = KeystoreEnvelope::parse(&fs::read(manager.path()).unwrap()).unwrap();

    let mut future = original.clone();
    future.version = 99;
    fs::write(manager.path(), serde_json::to_vec(&future).unwrap()).unwrap();
    let result = manager.open_or_create(&pw);
    assert!(matches!(result, Err(CoreError::UnsupportedAlgorithm(_))));
    assert!(result.unwrap_err().is_environment_error());

    let mut exotic = original;
    exotic.crypto.cipher.function = "serpent-256-xts".into();
    fs::write(manager.path(), exotic.to_bytes().unwrap()).unwrap();
    assert!(matches!(
        manager.open_or_create(&pw),
        Err(CoreError::UnsupportedAlgorithm(_))
    ));
}

#[test]
fn test_persist_leaves_no_temp_files() {
    let dir = tempdir().unwrap();
    let manager = manager(dir.path());
    let pw = store_password(STORE_PASSWORD);
    let keystore = manager.open_or_create(&pw).unwrap();
    manager.persist(&keystore, &pw).unwrap();
    manager.persist(&keystore, &pw).unwrap();

    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("keys.keystore")]);
}

#[test]
fn test_persist_creates_parent_directories() {
    let dir = tempdir().unwrap();
    let manager = cryptolog::KeyStoreManager::new(dir.path().join("nested/deeper/k.keystore"))
        .with_kdf_iterations(common::TEST_KDF_ITERATIONS);
    manager
        .open_or_create(&store_password(STORE_PASSWORD))
        .unwrap();
    assert!(manager.exists());
}

#[cfg(unix)]
#[test]
fn test_keystore_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let manager = manager(dir.path());
    manager
        .open_or_create(&store_password(STORE_PASSWORD))
        .unwrap();

    let mode = fs::metadata(manager.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_change_password_keeps_entries() {
    let dir = tempdir().unwrap();
    let manager = manager(dir.path());
    let old = store_password("old-store-pw");
    let new = store_password("new-store-pw");

    let key = generate_key().unwrap();
    let mut keystore = manager.open_or_create(&old).unwrap();
    keystore.store("report", &key, &key_password("kp")).unwrap();
    manager.persist(&keystore, &old).unwrap();

    manager.change_password(&old, &new).unwrap();

    assert!(matches!(
        manager.open_or_create(&old),
        Err(CoreError::KeystorePassword)
    ));
    let reopened = manager.open_or_create(&new).unwrap();
    let retrieved = reopened.retrieve("report", &key_password("kp")).unwrap();
    assert_eq!(retrieved.expose_secret(), key.expose_secret());
}

#[test]
fn test_change_password_requires_existing_keystore() {
    let dir = tempdir().unwrap();
    let manager = manager(dir.path());
    let result = manager.change_password(&store_password("a"), &store_password("b"));
    assert!(matches!(result, Err(CoreError::Io(_))));
    assert!(!manager.exists());
}

#[test]
fn test_open_never_creates_a_keystore() {
    let dir = tempdir().unwrap();
    let manager = cryptolog::KeyStoreManager::new(dir.path().join("typo.keystore"))
        .with_kdf_iterations(common::TEST_KDF_ITERATIONS);

    let result = manager.open(&store_password(STORE_PASSWORD));
    assert!(matches!(
        result,
        Err(CoreError::Io(ref e)) if e.kind() == std::io::ErrorKind::NotFound
    ));
    assert!(!manager.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_open_unlocks_existing_keystore() {
    let dir = tempdir().unwrap();
    let manager = manager(dir.path());
    let pw = store_password(STORE_PASSWORD);
    let mut keystore = manager.open_or_create(&pw).unwrap();
    keystore
        .store("alpha", &generate_key().unwrap(), &key_password("a"))
        .unwrap();
    manager.persist(&keystore, &pw).unwrap();

    assert_eq!(manager.open(&pw).unwrap(), keystore);
    assert!(matches!(
        manager.open(&store_password("wrong")),
        Err(CoreError::KeystorePassword)
    ));
}
