// src/platform.rs

//! Per-platform knowledge about `steamcmd`: where to download it, how it is
//! packaged, which file is the executable, what has to happen before first
//! use, and where it caches credentials.

use std::path::{Path, PathBuf};

use anyhow::anyhow;
use tracing::{info, warn};

use crate::archive::ArchiveKind;
use crate::download::{Source, fetch_and_extract_async};
use crate::errors::{DeployError, Result};
use crate::exec::{self, ProcessSpec};

/// Host platforms `steamcmd` is distributed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    Mac,
    Windows,
}

/// Static description of a platform's `steamcmd` distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformProfile {
    /// Default download location.
    pub source: &'static str,
    /// Packaging of the download.
    pub archive: ArchiveKind,
    /// Executable, relative to the installation directory.
    pub executable: &'static str,
}

const LINUX: PlatformProfile = PlatformProfile {
    source: "https://steamcdn-a.akamaihd.net/client/installer/steamcmd_linux.tar.gz",
    archive: ArchiveKind::TarGz,
    executable: "steamcmd.sh",
};

const MAC: PlatformProfile = PlatformProfile {
    source: "https://steamcdn-a.akamaihd.net/client/installer/steamcmd_osx.tar.gz",
    archive: ArchiveKind::TarGz,
    executable: "steamcmd",
};

const WINDOWS: PlatformProfile = PlatformProfile {
    source: "https://steamcdn-a.akamaihd.net/client/installer/steamcmd.zip",
    archive: ArchiveKind::Zip,
    executable: "steamcmd.exe",
};

impl Platform {
    /// The platform this binary is running on.
    pub fn detect() -> Result<Self> {
        Self::from_os_name(std::env::consts::OS).ok_or_else(|| {
            DeployError::Other(anyhow!(
                "failed to detect platform from OS '{}'",
                std::env::consts::OS
            ))
        })
    }

    /// Match an OS name such as `"linux"`, `"macos"`, `"Mac OS X"` or
    /// `"Windows 11"`, case-insensitively.
    pub fn from_os_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        if name.contains("linux") {
            Some(Platform::Linux)
        } else if name.contains("mac") || name.contains("darwin") {
            Some(Platform::Mac)
        } else if name.contains("windows") {
            Some(Platform::Windows)
        } else {
            None
        }
    }

    pub fn profile(self) -> &'static PlatformProfile {
        match self {
            Platform::Linux => &LINUX,
            Platform::Mac => &MAC,
            Platform::Windows => &WINDOWS,
        }
    }

    pub fn default_source(self) -> Source {
        Source::Url(self.profile().source.to_string())
    }

    pub fn executable(self) -> &'static str {
        self.profile().executable
    }

    /// Download `source` (or the platform default) and extract it into
    /// `destination`.
    pub async fn install_to(self, source: Option<Source>, destination: &Path) -> Result<()> {
        let source = source.unwrap_or_else(|| self.default_source());
        fetch_and_extract_async(source, self.profile().archive, destination.to_path_buf()).await
    }

    /// Commands that make a fresh installation in `cmd_dir` usable.
    pub fn prep_commands(self, cmd_dir: &Path) -> Result<Vec<ProcessSpec>> {
        let exe = absolute(&cmd_dir.join(self.executable()))?;
        let commands = match self {
            Platform::Linux => vec![
                ProcessSpec::new(["chmod", "+x", exe.as_str()]),
                ProcessSpec::new([
                    "chmod".to_string(),
                    "+x".to_string(),
                    absolute(&cmd_dir.join("linux32").join("steamcmd"))?,
                ]),
            ],
            Platform::Mac => vec![
                ProcessSpec::new(["chmod", "+x", exe.as_str()]),
                ProcessSpec::new(["bash", "steamcmd.sh", "+quit"]).in_dir(cmd_dir),
            ],
            // The first run updates steamcmd and exits with status 7, so get
            // it out of the way here where the status doesn't matter.
            Platform::Windows => vec![ProcessSpec::new([exe, "+quit".to_string()])],
        };
        Ok(commands)
    }

    /// Run [`Platform::prep_commands`]. Their exit statuses are logged, not
    /// enforced; only a failure to start one is an error.
    pub async fn prepare(self, cmd_dir: &Path) -> Result<()> {
        for spec in self.prep_commands(cmd_dir)? {
            let command = spec.args.join(" ");
            let result = exec::run(spec).await?;
            if result.success() {
                info!(platform = ?self, command = %command, "preparation step done");
            } else {
                warn!(
                    platform = ?self,
                    command = %command,
                    status = result.status(),
                    "preparation step returned non-zero status"
                );
            }
        }
        Ok(())
    }

    /// Directory holding `config/config.vdf`, where `steamcmd` caches a
    /// logged-in session.
    pub fn steam_home(self, installation: &Path) -> Result<PathBuf> {
        match self {
            Platform::Linux => Ok(home_dir()?.join(".steam").join("steam")),
            Platform::Mac => Ok(home_dir()?
                .join("Library")
                .join("Application Support")
                .join("Steam")),
            Platform::Windows => Ok(installation.to_path_buf()),
        }
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| DeployError::Other(anyhow!("could not determine the home directory")))
}

fn absolute(path: &Path) -> Result<String> {
    Ok(std::path::absolute(path)?.to_string_lossy().into_owned())
}
