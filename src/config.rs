//! Configuration management
//!
//! Loads library settings from an optional TOML file with environment overrides
//! (`XPLAT_STORAGE_*`). Every field has a default so an empty source is valid.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::storage::CollisionPolicy;

const ENV_PREFIX: &str = "XPLAT_STORAGE";
const DEFAULT_CONFIG_NAME: &str = "xplat-storage";

/// Storage layer configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// Number of blocking host calls allowed to run at once
    /// Environment: XPLAT_STORAGE_WORKER_THREADS
    pub worker_threads: usize,

    /// Overrides the platform application data directories when set
    pub app_data_root: Option<PathBuf>,

    /// Reverse-domain qualifier used to resolve platform directories
    pub qualifier: String,
    pub organization: String,
    pub application: String,

    /// Policy applied by the `*_default` create helpers
    pub default_collision_policy: CollisionPolicy,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            worker_threads: 4,
            app_data_root: None,
            qualifier: "com".to_string(),
            organization: "xplat".to_string(),
            application: "xplat-storage".to_string(),
            default_collision_policy: CollisionPolicy::FailIfExists,
        }
    }
}

impl StorageConfig {
    /// Load configuration from `xplat-storage.toml` (if present) with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(
            Config::builder().add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        )
    }

    /// Load configuration from a specific file with environment overrides
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::build(Config::builder().add_source(File::from(path).required(true)))
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;
        let config: StorageConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_threads == 0 {
            return Err(ConfigError::Invalid(
                "worker_threads must be greater than 0".into(),
            ));
        }

        if self.application.trim().is_empty() {
            return Err(ConfigError::Invalid("application cannot be empty".into()));
        }

        if let Some(root) = &self.app_data_root {
            if root.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("app_data_root cannot be empty".into()));
            }
        }

        Ok(())
    }
}
