// src/injectable.rs

//! Files that get written into a `steamcmd` installation: build scripts and
//! cached session credentials.

use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use crate::errors::{DeployError, Result};
use crate::vdf::VdfBuilder;

/// Content destined for a file, taken either from an existing file or held
/// in memory.
#[derive(Clone, PartialEq, Eq)]
pub enum InjectableFile {
    FromPath(PathBuf),
    Content(Vec<u8>),
}

impl InjectableFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        InjectableFile::FromPath(path.into())
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        InjectableFile::Content(text.into().into_bytes())
    }

    /// Decode base64 content. Line breaks are ignored, so wrapped values
    /// copied from a terminal or CI secret store decode as-is.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let compact: String = encoded
            .chars()
            .filter(|c| *c != '\n' && *c != '\r')
            .collect();
        let bytes = STANDARD
            .decode(compact.trim())
            .map_err(|e| DeployError::ConfigError(format!("invalid base64 content: {e}")))?;
        Ok(InjectableFile::Content(bytes))
    }

    /// The `AppBuild` script for a single depot whose content is everything
    /// under `../content`.
    pub fn app_build(
        app_id: u32,
        description: &str,
        verbose: bool,
        preview: bool,
        depot_id: u32,
    ) -> Self {
        let script = VdfBuilder::new("AppBuild")
            .value("AppId", app_id)
            .value("Desc", description)
            .value("verbose", flag(verbose))
            .value("preview", flag(preview))
            .value("ContentRoot", "..\\content\\")
            .value("BuildOutput", "..\\output\\")
            .object("Depots", |depots| {
                depots.object(depot_id.to_string(), |depot| {
                    depot.object("FileMapping", |mapping| {
                        mapping
                            .value("LocalPath", "*")
                            .value("DepotPath", ".")
                            .value("recursive", "1")
                    })
                })
            });
        Self::from_text(script.render())
    }

    /// Write (or overwrite) `destination`, creating parent directories.
    pub fn write_to(&self, destination: &Path) -> Result<()> {
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        match self {
            InjectableFile::FromPath(source) => {
                fs::copy(source, destination)?;
            }
            InjectableFile::Content(bytes) => fs::write(destination, bytes)?,
        }
        debug!(destination = %destination.display(), "file injected");
        Ok(())
    }
}

// Session VDFs are credentials; keep their bytes out of logs.
impl std::fmt::Debug for InjectableFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InjectableFile::FromPath(path) => f.debug_tuple("FromPath").field(path).finish(),
            InjectableFile::Content(bytes) => write!(f, "Content({} bytes)", bytes.len()),
        }
    }
}

fn flag(on: bool) -> &'static str {
    if on { "1" } else { "0" }
}
