//! Image handling infrastructure.
//!
//! This module provides:
//! - The read-through image cache
//! - HTTP downloads into the cache directory

pub mod cache;
pub mod downloader;

pub use cache::ImageCache;
pub use downloader::{HttpImageDownloader, ImageDownloaderConfig};
