// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{DeployConfig, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - a missing user name,
///   - a build script combined with app build parameters,
///   - an incomplete app/depot id pair,
///   - unparsable or zero timeouts.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<DeployConfig> {
    let raw_config = load_from_path(&path)?;
    let config = DeployConfig::try_from(raw_config)?;
    Ok(config)
}

/// `Steamdeploy.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Steamdeploy.toml")
}
