//! Configuration loading from files and environment

use std::path::{Path, PathBuf};

use super::types::Config;
use crate::{Error, Result};

/// Environment variable naming an alternative global config file.
pub const CONFIG_ENV: &str = "PASSTHRU_CONFIG";

/// Load configuration from all sources with hierarchy
///
/// # Errors
///
/// Returns error if:
/// - A config file is malformed TOML
/// - An environment override is invalid
/// - Config values fail validation
pub fn load_config() -> Result<Config> {
    let config = Config::default();

    let config = match global_config_path() {
        Some(path) if path.exists() => config.merge(load_toml_file(&path)?),
        _ => config,
    };

    let project_path = project_config_path()?;
    let config = if project_path.exists() {
        config.merge(load_toml_file(&project_path)?)
    } else {
        config
    };

    let config = config.apply_env_vars()?;
    config.validate()?;

    tracing::debug!(backend = %config.backend, name = %config.name, "configuration loaded");
    Ok(config)
}

/// Get path to global config file
pub fn global_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    directories::ProjectDirs::from("", "", "passthru")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Get path to project config file
///
/// # Errors
///
/// Returns error if current directory cannot be determined
pub fn project_config_path() -> Result<PathBuf> {
    std::env::current_dir()
        .map(|dir| dir.join(".passthru/config.toml"))
        .map_err(|e| Error::Io(format!("Failed to get current directory: {e}")))
}

/// Load a TOML file into a partial Config
///
/// # Errors
///
/// Returns error if the file cannot be read, is a directory, or is not valid
/// TOML for this configuration.
pub fn load_toml_file(path: &Path) -> Result<Config> {
    if path.is_dir() {
        return Err(Error::Io(format!(
            "Config path is a directory, not a file: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Io(format!("Failed to read config file {}: {e}", path.display())))?;

    toml::from_str(&content).map_err(|e| {
        Error::Parse(format!(
            "Failed to parse config file {}: {e}",
            path.display()
        ))
    })
}

impl Config {
    /// Apply `PASSTHRU_*` environment variable overrides
    ///
    /// # Errors
    ///
    /// Returns error if environment variable values are invalid
    pub fn apply_env_vars(mut self) -> Result<Self> {
        if let Ok(value) = std::env::var("PASSTHRU_BACKEND") {
            if value.is_empty() {
                return Err(Error::InvalidConfig(
                    "PASSTHRU_BACKEND cannot be empty - unset the variable or name the backend"
                        .to_string(),
                ));
            }
            self.backend = value;
        }

        if let Ok(value) = std::env::var("PASSTHRU_NAME") {
            self.name = value;
        }

        if let Ok(value) = std::env::var("PASSTHRU_INTROSPECTION") {
            self.introspection = value.parse()?;
        }

        if let Ok(value) = std::env::var("PASSTHRU_INTROSPECTION_TIMEOUT") {
            self.introspection_timeout_secs = value.parse().map_err(|e| {
                Error::InvalidConfig(format!("Invalid PASSTHRU_INTROSPECTION_TIMEOUT value: {e}"))
            })?;
        }

        if let Ok(value) = std::env::var("PASSTHRU_INTERACTIVE") {
            self.interactive = value.parse()?;
        }

        Ok(self)
    }
}
