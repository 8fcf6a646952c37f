//! Configuration module for the Ruby symbol index.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file (`.ruby-index/settings.toml`)
//! - Environment variable overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `RI_` and use double underscores
//! to separate nested levels:
//! - `RI_INFERENCE__ENABLED=false` sets `inference.enabled`
//! - `RI_LOGGING__LEVEL=debug` sets `logging.level`
//! - `RI_DEBUG=true` sets `debug`

use crate::cache::FrameworkConvention;
use crate::error::{IndexError, IndexResult};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

const CONFIG_DIR: &str = ".ruby-index";
const CONFIG_FILE: &str = "settings.toml";
const ENV_PREFIX: &str = "RI_";

static GLOBAL_DEBUG: AtomicBool = AtomicBool::new(false);

/// Enable or disable the process-wide debug output used by `debug_print!`
pub fn set_global_debug(enabled: bool) {
    GLOBAL_DEBUG.store(enabled, Ordering::Relaxed);
}

pub fn is_global_debug_enabled() -> bool {
    GLOBAL_DEBUG.load(Ordering::Relaxed)
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Workspace root directory (where .ruby-index is located)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,

    /// Global debug mode
    #[serde(default = "default_false")]
    pub debug: bool,

    /// Return-type inference settings
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Base classes whose mixin modules contribute class methods to subclasses
    #[serde(default = "default_conventions")]
    pub conventions: Vec<FrameworkConvention>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct InferenceConfig {
    /// Run return-type inference after superclass propagation
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Scan the documentation when a method has no parameter text
    #[serde(default = "default_true")]
    pub scan_documentation: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_log_level() -> String {
    "warn".to_string()
}

fn default_conventions() -> Vec<FrameworkConvention> {
    FrameworkConvention::rails_defaults()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            workspace_root: None,
            debug: false,
            inference: InferenceConfig::default(),
            logging: LoggingConfig::default(),
            conventions: default_conventions(),
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scan_documentation: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(CONFIG_FILE));

        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_path))
            // Double underscore (__) separates nested levels
            .merge(Env::prefixed(ENV_PREFIX).map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
            .extract()
            .map_err(Box::new)
            .map(|mut settings: Settings| {
                if settings.workspace_root.is_none() {
                    settings.workspace_root = Self::workspace_root();
                }
                settings
            })
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(Box::new)
    }

    /// Find the settings file by looking for a .ruby-index directory
    /// from the current directory up to the root
    fn find_workspace_config() -> Option<PathBuf> {
        Self::workspace_root().map(|root| root.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Get the workspace root directory (where .ruby-index is located)
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        current
            .ancestors()
            .find(|ancestor| ancestor.join(CONFIG_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// Check that the configuration file exists and parses
    pub fn check_init() -> IndexResult<()> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(CONFIG_FILE));

        if !config_path.exists() {
            return Err(IndexError::ConfigError {
                reason: "No configuration file found".to_string(),
            });
        }

        let content =
            std::fs::read_to_string(&config_path).map_err(|e| IndexError::ConfigError {
                reason: format!("Cannot read configuration file: {e}"),
            })?;

        toml::from_str::<Settings>(&content).map_err(|e| IndexError::ConfigError {
            reason: format!("Configuration file is corrupted: {e}"),
        })?;

        Ok(())
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> IndexResult<()> {
        let path = path.as_ref();
        let parent = path.parent().ok_or_else(|| IndexError::ConfigError {
            reason: format!("Invalid settings path '{}'", path.display()),
        })?;
        std::fs::create_dir_all(parent).map_err(|e| IndexError::ConfigError {
            reason: format!("Cannot create '{}': {e}", parent.display()),
        })?;

        let toml_string = toml::to_string_pretty(self).map_err(|e| IndexError::ConfigError {
            reason: format!("Cannot serialize settings: {e}"),
        })?;
        std::fs::write(path, toml_string).map_err(|e| IndexError::ConfigError {
            reason: format!("Cannot write '{}': {e}", path.display()),
        })?;

        Ok(())
    }

    /// Find the convention registered for `base_class`
    pub fn convention_for(&self, base_class: &str) -> Option<&FrameworkConvention> {
        self.conventions
            .iter()
            .find(|convention| convention.base_class == base_class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.version, 1);
        assert!(!settings.debug);
        assert!(settings.inference.enabled);
        assert_eq!(settings.logging.level, "warn");
        assert!(settings.convention_for("ActiveRecord::Base").is_some());
        assert!(settings.convention_for("ActionController::Base").is_some());
        assert!(settings.convention_for("Object").is_none());
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("settings.toml");

        let toml_content = r#"
debug = true

[inference]
enabled = false

[[conventions]]
base_class = "Sequel::Model"
mixins = ["Sequel::Model::ClassMethods"]
"#;
        fs::write(&config_path, toml_content).unwrap();

        let settings = Settings::load_from(&config_path).unwrap();
        assert!(settings.debug);
        assert!(!settings.inference.enabled);
        // Unset fields keep their defaults
        assert!(settings.inference.scan_documentation);
        assert_eq!(settings.conventions.len(), 1);
        assert_eq!(
            settings.convention_for("Sequel::Model").unwrap().mixins,
            vec!["Sequel::Model::ClassMethods".to_string()]
        );
    }

    #[test]
    fn test_partial_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("settings.toml");

        fs::write(&config_path, "[logging]\nlevel = \"debug\"\n").unwrap();

        let settings = Settings::load_from(&config_path).unwrap();
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.version, 1);
        assert_eq!(settings.conventions, Settings::default().conventions);
    }

    #[test]
    fn test_save_settings() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_DIR).join(CONFIG_FILE);

        let mut settings = Settings::default();
        settings.inference.scan_documentation = false;
        settings.logging.level = "info".to_string();

        settings.save(&config_path).unwrap();

        let loaded = Settings::load_from(&config_path).unwrap();
        assert!(!loaded.inference.scan_documentation);
        assert_eq!(loaded.logging.level, "info");
        assert_eq!(loaded.conventions, settings.conventions);
    }

    #[test]
    fn test_global_debug_flag() {
        set_global_debug(true);
        assert!(is_global_debug_enabled());
        set_global_debug(false);
        assert!(!is_global_debug_enabled());
    }
}
