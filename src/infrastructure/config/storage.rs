use super::app_config::AppConfig;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Configuration loading errors.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ConfigError {
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Locates and reads `config.toml`.
#[derive(Debug)]
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Create a loader for the platform config file, or `path_override` if given.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if no override is given and the configuration
    /// directory cannot be determined.
    pub fn new(path_override: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path_override {
            Some(path) => path.to_path_buf(),
            None => AppConfig::default_config_path().ok_or(ConfigError::ConfigDirNotFound)?,
        };

        Ok(Self { config_path })
    }

    /// Returns the configuration file path.
    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Loads the application configuration.
    ///
    /// A missing file yields defaults; a malformed one is replaced by
    /// defaults. Logs nothing; call [`ConfigSource::report`] once logging
    /// is up.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be read.
    pub fn load(&self) -> Result<(AppConfig, ConfigSource), ConfigError> {
        if !self.config_path.exists() {
            return Ok((
                AppConfig::default(),
                ConfigSource::Missing(self.config_path.clone()),
            ));
        }

        let content = fs::read_to_string(&self.config_path)?;
        match toml::from_str::<AppConfig>(&content) {
            Ok(config) => Ok((config, ConfigSource::File(self.config_path.clone()))),
            Err(error) => Ok((
                AppConfig::default(),
                ConfigSource::Malformed {
                    path: self.config_path.clone(),
                    error,
                },
            )),
        }
    }
}

/// Where the loaded configuration came from.
#[derive(Debug)]
pub enum ConfigSource {
    /// Read from this file.
    File(PathBuf),
    /// No file at this path; defaults used.
    Missing(PathBuf),
    /// The file could not be parsed; defaults used.
    Malformed {
        /// Offending file.
        path: PathBuf,
        /// Parse failure.
        error: toml::de::Error,
    },
}

impl ConfigSource {
    /// Logs how the configuration was obtained.
    pub fn report(&self) {
        match self {
            Self::File(path) => info!(path = %path.display(), "Loaded config file"),
            Self::Missing(path) => {
                info!(path = %path.display(), "Config file not found, using defaults");
            }
            Self::Malformed { path, error } => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to parse config file, using defaults"
                );
            }
        }
    }

    /// Returns true if defaults replaced an unreadable file.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}
