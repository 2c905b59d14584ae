// src/config/validate.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::config::model::{BuildPlan, BuildSection, DeployConfig, RawConfigFile, TimeoutSection};
use crate::download::Source;
use crate::errors::{DeployError, Result};
use crate::exec::Timeouts;
use crate::platform::Platform;

impl TryFrom<RawConfigFile> for DeployConfig {
    type Error = crate::errors::DeployError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let user = validate_user(&raw)?;
        let build = validate_build(&raw.build)?;
        let timeouts = validate_timeouts(&raw.timeouts)?;
        let platform = validate_platform(raw.install.platform.as_deref())?;

        Ok(DeployConfig {
            user,
            cached_credentials: raw.steam.cached_credentials,
            install_dir: PathBuf::from(raw.install.directory),
            source: raw.install.source.as_deref().map(Source::parse),
            platform,
            application: raw.build.application.map(PathBuf::from),
            build,
            skip: raw.build.skip,
            timeouts,
        })
    }
}

fn validate_user(cfg: &RawConfigFile) -> Result<String> {
    let user = cfg.steam.user.trim();
    if user.is_empty() {
        return Err(DeployError::ConfigError(
            "[steam].user must be set to the account used for deployment".to_string(),
        ));
    }
    Ok(user.to_string())
}

fn validate_build(build: &BuildSection) -> Result<Option<BuildPlan>> {
    if let Some(script) = &build.script {
        let mut extraneous = Vec::new();
        if build.app_id.is_some() {
            extraneous.push("app_id");
        }
        if build.depot_id.is_some() {
            extraneous.push("depot_id");
        }
        if build.description.is_some() {
            extraneous.push("description");
        }
        if build.verbose.is_some() {
            extraneous.push("verbose");
        }
        if build.preview.is_some() {
            extraneous.push("preview");
        }
        if !extraneous.is_empty() {
            return Err(DeployError::ConfigError(format!(
                "[build].script cannot be combined with {}",
                extraneous.join(", ")
            )));
        }
        return Ok(Some(BuildPlan::Script(PathBuf::from(script))));
    }

    match (build.app_id, build.depot_id) {
        (Some(app_id), Some(depot_id)) => Ok(Some(BuildPlan::Generated {
            app_id,
            depot_id,
            description: build.description.clone(),
            verbose: build.verbose.unwrap_or(false),
            preview: build.preview.unwrap_or(false),
        })),
        (None, None)
            if build.description.is_none()
                && build.verbose.is_none()
                && build.preview.is_none() =>
        {
            Ok(None)
        }
        _ => Err(DeployError::ConfigError(
            "[build] needs both app_id and depot_id when no script is given".to_string(),
        )),
    }
}

fn validate_timeouts(section: &TimeoutSection) -> Result<Timeouts> {
    let defaults = Timeouts::default();
    Ok(Timeouts {
        total: timeout_or("total", section.total.as_deref(), defaults.total)?,
        inactivity: timeout_or("inactivity", section.inactivity.as_deref(), defaults.inactivity)?,
    })
}

fn timeout_or(field: &str, value: Option<&str>, default: Duration) -> Result<Duration> {
    let Some(value) = value else {
        return Ok(default);
    };
    let duration = parse_duration(value)
        .map_err(|e| DeployError::ConfigError(format!("[timeouts].{field}: {e}")))?;
    if duration.is_zero() {
        return Err(DeployError::ConfigError(format!(
            "[timeouts].{field} must be greater than zero"
        )));
    }
    Ok(duration)
}

fn validate_platform(name: Option<&str>) -> Result<Option<Platform>> {
    name.map(|name| {
        Platform::from_os_name(name).ok_or_else(|| {
            DeployError::ConfigError(format!(
                "[install].platform '{name}' is not one of linux, mac, windows"
            ))
        })
    })
    .transpose()
}

/// Parse a simple duration string like `"3s"`, `"250ms"`, `"5m"`, `"2h"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            ));
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration '{}' is out of range", s))
}
