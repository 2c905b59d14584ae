// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Timeouts are not errors here: a process that had to be killed
//! is reported through [`crate::exec::ProcessResult`] so callers still get
//! the output it produced.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Archive entry '{entry}' would be extracted outside the destination")]
    PathTraversal { entry: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Zip archive error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Download of {url} failed: {message}")]
    Download { url: String, message: String },

    #[error("steamcmd executable not found at {0}")]
    MissingExecutable(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Build failed with status {status}")]
    BuildFailed { status: i32 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DeployError>;
