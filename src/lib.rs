// src/lib.rs

pub mod archive;
pub mod auth;
pub mod cli;
pub mod config;
pub mod download;
pub mod errors;
pub mod exec;
pub mod files;
pub mod injectable;
pub mod logging;
pub mod platform;
pub mod steamcmd;
pub mod vdf;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info};

use crate::auth::Auth;
use crate::cli::{CliArgs, Command};
use crate::config::loader::load_and_validate;
use crate::config::model::{BuildPlan, DeployConfig};
use crate::errors::DeployError;
use crate::exec::ProcessResult;
use crate::platform::Platform;
use crate::steamcmd::SteamCmd;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and validation
/// - credential resolution from the environment
/// - `steamcmd` installation
/// - the selected command (deploy, install or login)
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    match args.command {
        Command::Install => {
            let steamcmd = install(&cfg).await?;
            info!(
                executable = %steamcmd.executable().display(),
                "steamcmd is installed"
            );
            Ok(())
        }
        Command::Login => {
            let auth = Auth::from_env(&cfg.user, cfg.cached_credentials)?;
            let steamcmd = install(&cfg).await?;
            steamcmd.inject_auth(&auth)?;
            let result = steamcmd.login_and_quit(&auth).await?;
            ensure_success(&result)?;
            info!(user = %auth.username(), "login succeeded");
            Ok(())
        }
        Command::Deploy { dry_run } => deploy(&cfg, dry_run).await,
    }
}

async fn deploy(cfg: &DeployConfig, dry_run: bool) -> Result<()> {
    if cfg.skip {
        info!("skipping steam deployment");
        return Ok(());
    }

    let plan = cfg.build.as_ref().ok_or_else(|| {
        DeployError::ConfigError(
            "missing app build parameters: set [build].script, or app_id and depot_id"
                .to_string(),
        )
    })?;
    let application = application_dir(cfg)?;

    // Resolve credentials before printing so a bad environment fails a dry
    // run too.
    let auth = Auth::from_env(&cfg.user, cfg.cached_credentials)?;

    if dry_run {
        print_dry_run(cfg, plan, application, &auth);
        return Ok(());
    }

    let steamcmd = install(cfg).await?;
    let result = steamcmd.deploy(&auth, application, &plan.script()).await?;
    ensure_success(&result)?;
    info!(application = %application.display(), "deployment finished");
    Ok(())
}

async fn install(cfg: &DeployConfig) -> Result<SteamCmd> {
    let platform = match cfg.platform {
        Some(platform) => platform,
        None => Platform::detect()?,
    };
    let steamcmd = SteamCmd::install(platform, cfg.source.clone(), &cfg.install_dir)
        .await?
        .with_timeouts(cfg.timeouts);
    Ok(steamcmd)
}

fn application_dir(cfg: &DeployConfig) -> Result<&Path> {
    let application = cfg.application.as_deref().ok_or_else(|| {
        DeployError::ConfigError("[build].application must name the directory to upload".to_string())
    })?;
    if !application.is_dir() {
        return Err(DeployError::ConfigError(format!(
            "application directory {} does not exist",
            application.display()
        ))
        .into());
    }
    Ok(application)
}

fn ensure_success(result: &ProcessResult) -> std::result::Result<(), DeployError> {
    if result.success() {
        Ok(())
    } else {
        Err(DeployError::BuildFailed {
            status: result.status(),
        })
    }
}

/// Simple dry-run output: print what a deployment would do.
fn print_dry_run(cfg: &DeployConfig, plan: &BuildPlan, application: &Path, auth: &Auth) {
    println!("steamdeploy dry-run");
    println!("  user = {}", cfg.user);
    println!("  credential = {:?}", auth.credential());
    println!("  install.directory = {}", cfg.install_dir.display());
    if let Some(ref source) = cfg.source {
        println!("  install.source = {source}");
    }
    if let Some(platform) = cfg.platform {
        println!("  install.platform = {platform:?}");
    }
    println!("  application = {}", application.display());
    println!(
        "  timeouts = total {:?}, inactivity {:?}",
        cfg.timeouts.total, cfg.timeouts.inactivity
    );
    println!();

    match plan {
        BuildPlan::Script(path) => println!("build script: {}", path.display()),
        BuildPlan::Generated { .. } => {
            println!("generated build script:");
            if let crate::injectable::InjectableFile::Content(bytes) = plan.script() {
                print!("{}", String::from_utf8_lossy(&bytes));
            }
        }
    }

    debug!("dry-run complete (no execution)");
}
