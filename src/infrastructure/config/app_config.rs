//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::infrastructure::cache::{CacheLayout, MetadataLayout};
use crate::infrastructure::image::ImageDownloaderConfig;

const APP_NAME: &str = "wishcache";
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "wishlist";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, read from `config.toml` and overridden by CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path. Logs go to stderr when unset.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Cache root directory.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Extension appended to cached image files.
    #[serde(default = "default_image_extension")]
    pub image_extension: String,

    /// Where metadata entries are stored.
    #[serde(default)]
    pub metadata_layout: MetadataLayout,

    /// Download timeout in seconds. Unset keeps the transport default.
    #[serde(default)]
    pub download_timeout_secs: Option<u64>,

    /// User agent for image downloads.
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Maximum resolutions in flight for a batch.
    #[serde(default = "default_max_concurrent_resolves")]
    pub max_concurrent_resolves: usize,
}

fn default_image_extension() -> String {
    "jpg".to_string()
}

const fn default_max_concurrent_resolves() -> usize {
    4
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            cache_dir: None,
            image_extension: default_image_extension(),
            metadata_layout: MetadataLayout::default(),
            download_timeout_secs: None,
            user_agent: None,
            max_concurrent_resolves: default_max_concurrent_resolves(),
        }
    }
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(cache_dir) = &args.cache_dir {
            self.cache_dir = Some(cache_dir.clone());
        }
        if let Some(layout) = args.metadata_layout {
            self.metadata_layout = layout;
        }
        if let Some(timeout) = args.download_timeout_secs {
            self.download_timeout_secs = Some(timeout);
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Returns default cache root, on durable app storage.
    #[must_use]
    pub fn default_cache_dir() -> PathBuf {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME).map_or_else(
            || std::env::temp_dir().join(APP_NAME).join("cache"),
            |dirs| dirs.data_dir().join("cache"),
        )
    }

    /// Returns the absolute cache root.
    #[must_use]
    pub fn effective_cache_dir(&self) -> PathBuf {
        let dir = self.cache_dir.clone().unwrap_or_else(Self::default_cache_dir);
        std::path::absolute(&dir).unwrap_or(dir)
    }

    /// Builds the on-disk cache layout.
    #[must_use]
    pub fn cache_layout(&self) -> CacheLayout {
        CacheLayout::new(self.effective_cache_dir())
            .with_image_extension(self.image_extension.as_str())
            .with_metadata_layout(self.metadata_layout)
    }

    /// Builds the downloader configuration.
    #[must_use]
    pub fn downloader_config(&self) -> ImageDownloaderConfig {
        ImageDownloaderConfig {
            timeout: self.download_timeout_secs.map(Duration::from_secs),
            user_agent: self.user_agent.clone(),
        }
    }
}
