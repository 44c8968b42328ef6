//! Configuration management for swbuild

pub mod schema;

pub use schema::{Config, InjectConfig, ManifestConfig, RuntimeCachingConfig, TemplatedSource};

use crate::error::{SwBuildError, SwBuildResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// File name searched for when no `--config` is given
pub const LOCAL_CONFIG_FILE: &str = "swbuild.toml";

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default (user-level) config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("swbuild")
            .join("config.toml")
    }

    /// Walk up from `start` looking for a project `swbuild.toml`
    pub fn find_local_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(LOCAL_CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Load configuration, falling back to defaults if the file is missing
    pub async fn load(&self) -> SwBuildResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration from a specific file.
    ///
    /// Relative paths in the file are resolved against the directory the
    /// file lives in.
    pub async fn load_from_file(&self, path: &Path) -> SwBuildResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| SwBuildError::io(format!("reading config from {}", path.display()), e))?;

        let mut config: Config =
            toml::from_str(&content).map_err(|e| SwBuildError::ConfigInvalid {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if let Some(base) = path.parent() {
            rebase_paths(&mut config, base);
        }

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn rebase_paths(config: &mut Config, base: &Path) {
    let rebase = |p: &mut PathBuf| {
        if p.is_relative() {
            *p = base.join(&*p);
        }
    };
    rebase(&mut config.manifest.glob_directory);
    rebase(&mut config.inject.sw_src);
    rebase(&mut config.inject.sw_dest);
}
