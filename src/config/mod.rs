// src/config/mod.rs
//! Configuration system for cryptolog
//!
//! TOML file + env overrides, falling back to built-in defaults.

pub use app::{load, Config, Paths, Security, CONFIG_ENV, KEYSTORE_ENV};

mod app;
mod defaults;
