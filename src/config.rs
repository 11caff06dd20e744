//! kapsule configuration.
//!
//! The only setting is the backend executable. It is resolved from the
//! built-in default, then the config file, then the environment.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application name for config file storage.
const APP_NAME: &str = "kapsule";

/// Config file name inside the application config directory.
const CONFIG_FILENAME: &str = "config.toml";

/// Backend executable used when nothing else is configured.
pub const DEFAULT_BACKEND: &str = "ignite";

/// Environment variable overriding the backend executable.
pub const BACKEND_ENV: &str = "KAPSULE_BACKEND";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "KAPSULE_CONFIG";

/// Global kapsule configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct KapsuleConfig {
    /// Backend executable (name on PATH or absolute path).
    pub backend: String,
}

impl Default for KapsuleConfig {
    fn default() -> Self {
        Self {
            backend: DEFAULT_BACKEND.to_string(),
        }
    }
}

impl KapsuleConfig {
    /// Load configuration from the config file and environment.
    ///
    /// A missing config file yields the defaults.
    pub fn load() -> Result<Self> {
        let mut config = match config_path() {
            Some(path) => Self::load_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(std::env::var(BACKEND_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Defaults with the environment override applied, ignoring the file.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(std::env::var(BACKEND_ENV).ok());
        if config.validate().is_err() {
            return Self::default();
        }
        config
    }

    /// Load a config file, returning defaults if it doesn't exist.
    pub fn load_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(Error::ConfigLoad(format!("{}: {}", path.display(), e)));
            }
        };
        Self::parse(&contents).map_err(|e| Error::ConfigLoad(format!("{}: {}", path.display(), e)))
    }

    /// Parse config from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::ConfigLoad(e.to_string()))
    }

    /// Apply a backend override from the environment.
    pub fn apply_env(&mut self, backend: Option<String>) {
        if let Some(backend) = backend.filter(|b| !b.is_empty()) {
            tracing::debug!(backend = %backend, "backend overridden by {}", BACKEND_ENV);
            self.backend = backend;
        }
    }

    /// Reject unusable values.
    pub fn validate(&self) -> Result<()> {
        if self.backend.trim().is_empty() {
            return Err(Error::config("backend must not be empty"));
        }
        Ok(())
    }
}

/// Location of the config file, if one can be determined.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILENAME))
}
