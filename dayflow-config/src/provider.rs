//! Configuration provider using Figment for Dayflow

use crate::{error::ConfigError, types::DayflowConfig, ConfigResult};
use dayflow_common::Pretty;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Directory searched for config files when none is given
pub const CONFIG_DIR_NAME: &str = ".dayflow";

/// Base name of config files inside the config directory
pub const CONFIG_FILE_STEM: &str = "dayflow";

/// Prefix for environment overrides. `__` separates nested keys.
pub const ENV_PREFIX: &str = "DAYFLOW_";

/// Configuration provider using figment
///
/// Sources are merged in precedence order (later sources override earlier ones):
/// 1. Default values
/// 2. `dayflow.toml`, `dayflow.yaml`/`dayflow.yml`, `dayflow.json` in the config directory
/// 3. `DAYFLOW_`-prefixed environment variables, e.g. `DAYFLOW_LOCK__TIMEOUT_SECS=90`
///
/// No caching is performed; every call to [`ConfigProvider::load`] reads the sources again.
#[derive(Debug, Clone, Default)]
pub struct ConfigProvider {
    config_dir: Option<PathBuf>,
}

impl ConfigProvider {
    /// Provider reading `./.dayflow/`
    pub fn new() -> Self {
        Self { config_dir: None }
    }

    /// Provider reading config files from `dir`
    pub fn with_config_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: Some(dir.into()),
        }
    }

    /// Load, merge and validate the configuration
    pub fn load(&self) -> ConfigResult<DayflowConfig> {
        let figment = self.build_figment()?;
        let config: DayflowConfig = figment.extract().map_err(ConfigError::from)?;
        config.validate()?;
        debug!("loaded configuration: {}", Pretty(&config));
        Ok(config)
    }

    fn config_dir(&self) -> ConfigResult<PathBuf> {
        match &self.config_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir()
                .map(|cwd| cwd.join(CONFIG_DIR_NAME))
                .map_err(|_| ConfigError::CurrentDirectoryNotFound),
        }
    }

    fn build_figment(&self) -> ConfigResult<Figment> {
        let dir = self.config_dir()?;
        Ok(Figment::new()
            .merge(Serialized::defaults(DayflowConfig::default()))
            .merge(Self::load_config_files(&dir))
            .merge(Self::load_env_vars()))
    }

    fn load_config_files(dir: &Path) -> Figment {
        let mut figment = Figment::new();
        for ext in ["toml", "yaml", "yml", "json"] {
            let path = dir.join(format!("{CONFIG_FILE_STEM}.{ext}"));
            if !path.is_file() {
                continue;
            }
            trace!("Loading config file: {}", path.display());
            figment = match ext {
                "toml" => figment.merge(Toml::file(&path)),
                "json" => figment.merge(Json::file(&path)),
                _ => figment.merge(Yaml::file(&path)),
            };
        }
        figment
    }

    fn load_env_vars() -> Env {
        Env::prefixed(ENV_PREFIX).split("__")
    }
}
