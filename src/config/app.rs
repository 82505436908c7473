// src/config/app.rs
//! Config structs, validation and runtime loading

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::defaults::*;
use crate::error::{CoreError, Result};

/// Env var naming an explicit config file
pub const CONFIG_ENV: &str = "CRYPTOLOG_CONFIG";

/// Env var overriding `paths.keystore`
pub const KEYSTORE_ENV: &str = "CRYPTOLOG_KEYSTORE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: Paths,
    pub security: Security,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paths {
    pub keystore: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Security {
    /// PBKDF2 rounds used when sealing the keystore and its entries
    pub kdf_iterations: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: default_paths(),
            security: default_security(),
        }
    }
}

impl Default for Paths {
    fn default() -> Self {
        default_paths()
    }
}

impl Default for Security {
    fn default() -> Self {
        default_security()
    }
}

impl Config {
    /// Parse a TOML config; missing sections take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let conf: Config = toml::from_str(content)?;
        conf.validate()?;
        Ok(conf)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.security.kdf_iterations == 0 {
            return Err(CoreError::Config(
                "security.kdf_iterations must be at least 1".into(),
            ));
        }
        if self.paths.keystore.as_os_str().is_empty() {
            return Err(CoreError::Config("paths.keystore must not be empty".into()));
        }
        Ok(())
    }
}

/// Load config at runtime
///
/// Lookup order: `$CRYPTOLOG_CONFIG`, the platform config file, then
/// built-in defaults. `$CRYPTOLOG_KEYSTORE` overrides the keystore path.
pub fn load() -> Result<Config> {
    let mut conf = match std::env::var_os(CONFIG_ENV) {
        // An explicit path must exist
        Some(path) => {
            debug!(path = %Path::new(&path).display(), "loading config from {CONFIG_ENV}");
            Config::from_file(&path)?
        }
        None => match default_config_file().filter(|p| p.exists()) {
            Some(path) => {
                debug!(path = %path.display(), "loading config");
                Config::from_file(&path)?
            }
            None => {
                debug!("no config file found, using built-in defaults");
                Config::default()
            }
        },
    };

    if let Some(keystore) = std::env::var_os(KEYSTORE_ENV) {
        if keystore.is_empty() {
            warn!("{KEYSTORE_ENV} is set but empty, ignoring");
        } else {
            conf.paths.keystore = PathBuf::from(keystore);
        }
    }

    conf.validate()?;
    Ok(conf)
}
