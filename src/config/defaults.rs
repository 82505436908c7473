// src/config/defaults.rs
//! Built-in defaults and the platform config location

use std::path::PathBuf;

use crate::config::app::{Paths, Security};
use crate::consts::{DEFAULT_KDF_ITERATIONS, DEFAULT_KEYSTORE_FILE};

/// Directory under the platform config dir that holds `config.toml`
pub const CONFIG_DIR_NAME: &str = "cryptolog";
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub fn default_paths() -> Paths {
    Paths {
        keystore: PathBuf::from(DEFAULT_KEYSTORE_FILE),
    }
}

pub fn default_security() -> Security {
    Security {
        kdf_iterations: DEFAULT_KDF_ITERATIONS,
    }
}

/// `~/.config/cryptolog/config.toml` (or the platform equivalent)
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
