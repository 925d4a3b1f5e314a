use super::app_config::LogLevel;
use crate::infrastructure::cache::MetadataLayout;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "wishcache",
    version,
    about = "On-device image cache for the wishlist app",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH", global = true)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Cache root directory.
    #[arg(long, value_name = "DIR", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Metadata file layout.
    #[arg(long, value_enum, global = true)]
    pub metadata_layout: Option<MetadataLayout>,

    /// Download timeout in seconds.
    #[arg(long, value_name = "SECS", global = true)]
    pub download_timeout_secs: Option<u64>,

    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Cache operations.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a renderable source for each URL, downloading on miss.
    Resolve {
        /// Remote image URLs.
        #[arg(required = true, value_name = "URL")]
        urls: Vec<String>,

        /// Owner id namespacing the cache entry (single URL only).
        #[arg(long, value_name = "ID")]
        owner: Option<String>,
    },
    /// Print the cached path for a URL without touching the network.
    Lookup {
        /// Remote image URL.
        url: String,

        /// Owner id namespacing the cache entry.
        #[arg(long, value_name = "ID")]
        owner: Option<String>,
    },
    /// Download a URL again and record a fresh entry.
    Refresh {
        /// Remote image URL.
        url: String,

        /// Owner id namespacing the cache entry.
        #[arg(long, value_name = "ID")]
        owner: Option<String>,
    },
    /// List every metadata entry.
    List,
}
