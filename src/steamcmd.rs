// src/steamcmd.rs

//! A `steamcmd` installation and the operations a deployment performs on it.
//!
//! Layout under the installation directory:
//!
//! - `<executable>`: platform-specific entry point.
//! - `content/`: the application being uploaded.
//! - `scripts/script.vdf`: the `AppBuild` script.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::auth::Auth;
use crate::download::Source;
use crate::errors::{DeployError, Result};
use crate::exec::{self, ProcessResult, ProcessSpec, Timeouts};
use crate::files::{copy_tree, recursive_delete};
use crate::injectable::InjectableFile;
use crate::platform::Platform;

const CONTENT_DIR: &str = "content";
const SCRIPTS_DIR: &str = "scripts";
const BUILD_SCRIPT: &str = "script.vdf";

#[derive(Debug, Clone)]
pub struct SteamCmd {
    platform: Platform,
    directory: PathBuf,
    timeouts: Timeouts,
}

impl SteamCmd {
    /// Install `steamcmd` into `directory` unless that directory already
    /// exists, in which case the existing installation is reused as-is.
    pub async fn install(
        platform: Platform,
        source: Option<Source>,
        directory: impl Into<PathBuf>,
    ) -> Result<Self> {
        let directory = directory.into();

        if directory.exists() {
            info!(directory = %directory.display(), "reusing existing steamcmd installation");
        } else {
            info!(
                platform = ?platform,
                directory = %directory.display(),
                "installing steamcmd"
            );
            platform.install_to(source, &directory).await?;
            platform.prepare(&directory).await?;
        }

        Ok(Self {
            platform,
            directory,
            timeouts: Timeouts::default(),
        })
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn executable(&self) -> PathBuf {
        self.directory.join(self.platform.executable())
    }

    pub fn content_dir(&self) -> PathBuf {
        self.directory.join(CONTENT_DIR)
    }

    pub fn script_path(&self) -> PathBuf {
        self.directory.join(SCRIPTS_DIR).join(BUILD_SCRIPT)
    }

    /// Where a session VDF has to live for `steamcmd` to pick it up.
    pub fn session_config_path(&self) -> Result<PathBuf> {
        Ok(self
            .platform
            .steam_home(&self.directory)?
            .join("config")
            .join("config.vdf"))
    }

    /// Write the session VDF carried by `auth`, if any.
    pub fn inject_auth(&self, auth: &Auth) -> Result<()> {
        let Some(vdf) = auth.session_vdf() else {
            return Ok(());
        };
        let destination = self.session_config_path()?;
        vdf.write_to(&destination)?;
        info!(user = %auth.username(), destination = %destination.display(), "session credentials injected");
        Ok(())
    }

    /// Replace the staged content with a copy of `application`.
    pub fn ingest_application(&self, application: &Path) -> Result<PathBuf> {
        let content = self.content_dir();
        recursive_delete(&content)?;
        let files = copy_tree(application, &content)?;
        info!(
            application = %application.display(),
            content = %content.display(),
            files,
            "application staged"
        );
        Ok(content)
    }

    pub fn write_build_script(&self, script: &InjectableFile) -> Result<PathBuf> {
        let path = self.script_path();
        script.write_to(&path)?;
        debug!(script = %path.display(), "build script written");
        Ok(path)
    }

    /// argv for a `steamcmd` invocation that logs in, optionally runs an app
    /// build, and quits.
    pub fn command_args(&self, auth: &Auth, script: Option<&Path>) -> Result<Vec<String>> {
        let executable = self.executable();
        if !executable.is_file() {
            return Err(DeployError::MissingExecutable(executable));
        }
        let executable = std::path::absolute(&executable)?;

        let mut args = vec![
            executable.to_string_lossy().into_owned(),
            "+login".to_string(),
            auth.username().to_string(),
        ];
        if let Some(password) = auth.password() {
            args.push(password.to_string());
        }
        if let Some(script) = script {
            let script = std::path::absolute(script)?;
            args.push("+run_app_build".to_string());
            args.push(script.to_string_lossy().into_owned());
        }
        args.push("+quit".to_string());
        Ok(args)
    }

    pub async fn login_and_quit(&self, auth: &Auth) -> Result<ProcessResult> {
        self.invoke(auth, None).await
    }

    pub async fn run_build(&self, auth: &Auth, script: &Path) -> Result<ProcessResult> {
        self.invoke(auth, Some(script)).await
    }

    /// Inject credentials, stage `application`, write `script` and run the
    /// build.
    pub async fn deploy(
        &self,
        auth: &Auth,
        application: &Path,
        script: &InjectableFile,
    ) -> Result<ProcessResult> {
        self.inject_auth(auth)?;
        self.ingest_application(application)?;
        let script = self.write_build_script(script)?;
        self.run_build(auth, &script).await
    }

    async fn invoke(&self, auth: &Auth, script: Option<&Path>) -> Result<ProcessResult> {
        let args = self.command_args(auth, script)?;
        info!(
            user = %auth.username(),
            script = ?script,
            timeouts = ?self.timeouts,
            "invoking steamcmd"
        );

        let spec = ProcessSpec::new(args)
            .in_dir(&self.directory)
            .with_timeouts(self.timeouts);
        let result = exec::run(spec).await?;

        if result.success() {
            info!(status = result.status(), lines = result.lines().len(), "steamcmd succeeded");
        } else {
            error!(
                status = result.status(),
                termination = ?result.termination(),
                "steamcmd failed"
            );
            for line in result.lines() {
                error!("{}", line);
            }
        }
        Ok(result)
    }
}
