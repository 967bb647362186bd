//! Configuration management for prebundle

pub mod schema;

pub use schema::Config;

use crate::error::{PrebundleError, PrebundleResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Project-local config file name
pub const LOCAL_CONFIG_FILE: &str = "prebundle.toml";

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

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("prebundle")
            .join("config.toml")
    }

    /// Find the nearest `prebundle.toml` at or above `start`
    pub fn find_local_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(LOCAL_CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Load configuration, using defaults if the file does not exist
    pub async fn load(&self) -> PrebundleResult<Config> {
        self.load_merged(None).await
    }

    /// Load the global configuration with a project-local file layered on top
    ///
    /// Tables merge key by key; any other local value (including
    /// `optimizer.include`) replaces the global one.
    pub async fn load_merged(&self, local: Option<&Path>) -> PrebundleResult<Config> {
        let mut merged = self.read_table(&self.config_path).await?;
        if let Some(path) = local {
            let overlay = self.read_table(path).await?;
            merge_tables(&mut merged, overlay);
        }

        let path = local.unwrap_or(&self.config_path);
        toml::Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| PrebundleError::ConfigInvalid {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }

    async fn read_table(&self, path: &Path) -> PrebundleResult<toml::Table> {
        if !path.exists() {
            debug!("Config file {} not found, using defaults", path.display());
            return Ok(toml::Table::new());
        }

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| PrebundleError::io(format!("reading config from {}", path.display()), e))?;

        content
            .parse::<toml::Table>()
            .map_err(|e| PrebundleError::ConfigInvalid {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
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

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match value {
            toml::Value::Table(incoming) => match base.get_mut(&key) {
                Some(toml::Value::Table(existing)) => merge_tables(existing, incoming),
                _ => {
                    base.insert(key, toml::Value::Table(incoming));
                }
            },
            value => {
                base.insert(key, value);
            }
        }
    }
}
