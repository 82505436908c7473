// src/core/mod.rs
//! Cryptographic core: key material, password sealing and the file cipher
//!
//! Nothing here touches the filesystem.

pub mod crypto;
pub mod key;
pub mod seal;
pub mod util;

pub use crypto::*;
pub use key::*;
pub use seal::{SealError, SealedBlob};
pub use util::*;

pub type Result<T> = std::result::Result<T, crate::error::CoreError>;
