// src/config/mod.rs

//! Configuration loading and validation for steamdeploy.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Check the file's invariants and resolve it into a `DeployConfig`
//!   (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{
    BuildPlan, BuildSection, DeployConfig, InstallSection, RawConfigFile, SteamSection,
    TimeoutSection,
};
pub use validate::parse_duration;
