// src/config/model.rs

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Deserialize;

use crate::download::Source;
use crate::exec::Timeouts;
use crate::injectable::InjectableFile;
use crate::platform::Platform;

/// Configuration as read from a TOML file.
///
/// ```toml
/// [steam]
/// user = "builder"
///
/// [install]
/// directory = "target/steamcmd"
///
/// [build]
/// application = "target/image"
/// app_id = 1000
/// depot_id = 1001
///
/// [timeouts]
/// total = "5m"
/// inactivity = "2m"
/// ```
///
/// Only `[steam].user` is required by the format; everything else has a
/// default or is optional. Use [`DeployConfig::try_from`] to validate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub steam: SteamSection,

    #[serde(default)]
    pub install: InstallSection,

    #[serde(default)]
    pub build: BuildSection,

    #[serde(default)]
    pub timeouts: TimeoutSection,
}

/// `[steam]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SteamSection {
    /// Account used for `+login`.
    #[serde(default)]
    pub user: String,

    /// Rely on a session already cached in the installation and ignore
    /// `STEAM_PASSWORD` / `STEAM_AUTH_VDF`.
    #[serde(default)]
    pub cached_credentials: bool,
}

/// `[install]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstallSection {
    /// Where `steamcmd` lives. Installed on first use if missing.
    #[serde(default = "default_install_directory")]
    pub directory: String,

    /// Override of the platform's download location (URL or local path).
    #[serde(default)]
    pub source: Option<String>,

    /// Override of the detected platform (`linux`, `mac`, `windows`).
    #[serde(default)]
    pub platform: Option<String>,
}

fn default_install_directory() -> String {
    "target/steamcmd".to_string()
}

impl Default for InstallSection {
    fn default() -> Self {
        Self {
            directory: default_install_directory(),
            source: None,
            platform: None,
        }
    }
}

/// `[build]` section.
///
/// Either `script` points at a hand-written `AppBuild` file, or `app_id`
/// and `depot_id` (plus the optional fields) describe one to generate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    /// Directory whose contents are uploaded.
    #[serde(default)]
    pub application: Option<String>,

    #[serde(default)]
    pub script: Option<String>,

    #[serde(default)]
    pub app_id: Option<u32>,

    #[serde(default)]
    pub depot_id: Option<u32>,

    /// Build description shown in the Steamworks dashboard.
    ///
    /// Defaults to `<os>@<unix seconds>`.
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub verbose: Option<bool>,

    #[serde(default)]
    pub preview: Option<bool>,

    /// Make `deploy` a no-op.
    #[serde(default)]
    pub skip: bool,
}

/// `[timeouts]` section, durations like `"90s"` or `"5m"`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeoutSection {
    #[serde(default)]
    pub total: Option<String>,

    #[serde(default)]
    pub inactivity: Option<String>,
}

/// Validated configuration, built from a [`RawConfigFile`].
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub user: String,
    pub cached_credentials: bool,
    pub install_dir: PathBuf,
    pub source: Option<Source>,
    pub platform: Option<Platform>,
    pub application: Option<PathBuf>,
    /// `None` when `[build]` names neither a script nor app/depot ids.
    pub build: Option<BuildPlan>,
    pub skip: bool,
    pub timeouts: Timeouts,
}

/// Where the `AppBuild` script comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildPlan {
    Script(PathBuf),
    Generated {
        app_id: u32,
        depot_id: u32,
        description: Option<String>,
        verbose: bool,
        preview: bool,
    },
}

impl BuildPlan {
    pub fn script(&self) -> InjectableFile {
        match self {
            BuildPlan::Script(path) => InjectableFile::from_path(path),
            BuildPlan::Generated {
                app_id,
                depot_id,
                description,
                verbose,
                preview,
            } => {
                let description = description.clone().unwrap_or_else(default_description);
                InjectableFile::app_build(*app_id, &description, *verbose, *preview, *depot_id)
            }
        }
    }
}

fn default_description() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    format!("{}@{}", std::env::consts::OS, now)
}
