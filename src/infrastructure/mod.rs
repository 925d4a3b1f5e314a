//! Infrastructure layer with storage, network and configuration adapters.

/// Cache directory layout and metadata store.
pub mod cache;
/// Application configuration.
pub mod config;
/// Image cache and HTTP downloader.
pub mod image;
/// Durable storage adapters.
pub mod storage;

pub use cache::{CacheLayout, MetadataLayout, MetadataStore};
pub use config::{
    AppConfig, CliArgs, Command, ConfigError, ConfigLoader, ConfigSource, LogLevel,
};
pub use image::{HttpImageDownloader, ImageCache, ImageDownloaderConfig};
pub use storage::LocalFileStorage;
