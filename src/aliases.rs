// src/aliases.rs
//! Re-exports secure-gate's ergonomic secret types
//!
//! These are the canonical secret types used throughout cryptolog.

pub use secure_gate::{dynamic_alias, fixed_alias};

// Fixed-size secrets
fixed_alias!(SecretKey, 16); // 128-bit AES file key
fixed_alias!(WrappingKey, 16); // PBKDF2 output used to seal keystore blobs

// Dynamic secrets
dynamic_alias!(StorePassword, String); // unlocks the keystore file as a whole
dynamic_alias!(KeyPassword, String); // unlocks one key entry
dynamic_alias!(PlainText, Vec<u8>);
dynamic_alias!(CypherText, Vec<u8>);
