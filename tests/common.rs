// tests/common.rs
//! Shared test utilities: logging setup and fast keystores

#![allow(dead_code)] // each test crate uses a different subset

use std::path::{Path, PathBuf};

use cryptolog::{KeyPassword, KeyStoreManager, StorePassword};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Low PBKDF2 cost so tests stay fast
pub const TEST_KDF_ITERATIONS: u32 = 1_000;

pub const STORE_PASSWORD: &str = "correct horse battery staple";
pub const KEY_PASSWORD: &str = "key-pass-2025";

/// Initialize test-friendly logging
/// Call at the start of any test that wants logs; safe to call repeatedly
pub fn setup() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer())
        .with(EnvFilter::from_default_env()) // respects RUST_LOG=
        .try_init()
        .ok();
}

pub fn keystore_path(dir: &Path) -> PathBuf {
    dir.join("keys.keystore")
}

pub fn manager(dir: &Path) -> KeyStoreManager {
    KeyStoreManager::new(keystore_path(dir)).with_kdf_iterations(TEST_KDF_ITERATIONS)
}

pub fn store_password(pw: &str) -> StorePassword {
    StorePassword::new(pw.to_string())
}

pub fn key_password(pw: &str) -> KeyPassword {
    KeyPassword::new(pw.to_string())
}
