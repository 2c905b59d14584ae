#![allow(dead_code)]

use steamdeploy::config::{DeployConfig, RawConfigFile};

/// Builder for `DeployConfig` to simplify test setup.
///
/// Starts from a config that only names a user.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        let mut config = RawConfigFile::default();
        config.steam.user = "builder".to_string();
        Self { config }
    }

    pub fn user(mut self, user: &str) -> Self {
        self.config.steam.user = user.to_string();
        self
    }

    pub fn cached_credentials(mut self, val: bool) -> Self {
        self.config.steam.cached_credentials = val;
        self
    }

    pub fn install_dir(mut self, dir: &str) -> Self {
        self.config.install.directory = dir.to_string();
        self
    }

    pub fn source(mut self, source: &str) -> Self {
        self.config.install.source = Some(source.to_string());
        self
    }

    pub fn platform(mut self, platform: &str) -> Self {
        self.config.install.platform = Some(platform.to_string());
        self
    }

    pub fn application(mut self, dir: &str) -> Self {
        self.config.build.application = Some(dir.to_string());
        self
    }

    pub fn script(mut self, path: &str) -> Self {
        self.config.build.script = Some(path.to_string());
        self
    }

    pub fn app(mut self, app_id: u32, depot_id: u32) -> Self {
        self.config.build.app_id = Some(app_id);
        self.config.build.depot_id = Some(depot_id);
        self
    }

    pub fn app_id(mut self, app_id: u32) -> Self {
        self.config.build.app_id = Some(app_id);
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.config.build.description = Some(description.to_string());
        self
    }

    pub fn verbose(mut self, val: bool) -> Self {
        self.config.build.verbose = Some(val);
        self
    }

    pub fn preview(mut self, val: bool) -> Self {
        self.config.build.preview = Some(val);
        self
    }

    pub fn skip(mut self, val: bool) -> Self {
        self.config.build.skip = val;
        self
    }

    pub fn timeouts(mut self, total: &str, inactivity: &str) -> Self {
        self.config.timeouts.total = Some(total.to_string());
        self.config.timeouts.inactivity = Some(inactivity.to_string());
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn try_build(self) -> steamdeploy::errors::Result<DeployConfig> {
        DeployConfig::try_from(self.config)
    }

    pub fn build(self) -> DeployConfig {
        self.try_build()
            .expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
