// src/consts.rs
//! Shared constants: security parameters and defaults

/// Default keystore file name, resolved against the working directory
pub const DEFAULT_KEYSTORE_FILE: &str = "keys.keystore";

/// PBKDF2-HMAC-SHA256 iterations for store and key passwords
// 600_000 follows current OWASP guidance for PBKDF2-SHA256
pub const DEFAULT_KDF_ITERATIONS: u32 = 600_000;

/// AES-128 key length in bytes
pub const KEY_LENGTH: usize = 16;

/// Random salt length for password derivation
pub const SALT_LENGTH: usize = 16;

/// AES-GCM nonce length
pub const NONCE_LENGTH: usize = 12;

/// AES-GCM authentication tag length
pub const TAG_LENGTH: usize = 16;

/// Header of every encrypted file: magic + format version
pub const CRYPTOLOG_MAGIC: &[u8; 3] = b"CLG";
pub const CRYPTOLOG_FORMAT_VERSION: u8 = 1;
pub const CRYPTOLOG_HEADER_LEN: usize = 4;

/// Keystore envelope identification
pub const KEYSTORE_FORMAT: &str = "cryptolog-keystore";
pub const KEYSTORE_VERSION: u32 = 1;

/// Extension that marks encrypted files
pub const ENCRYPTED_EXTENSION: &str = "encrypted";

/// Suffix appended to encrypted files
pub const ENCRYPTED_SUFFIX: &str = ".encrypted";

/// Marker inserted before the extension of decrypted files
pub const DECRYPTED_MARKER: &str = "decrypted";

/// Hex characters kept from a key's BLAKE3 digest for display
pub const FINGERPRINT_LENGTH_HEX: usize = 16;
