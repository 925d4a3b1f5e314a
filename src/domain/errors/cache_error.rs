//! Image cache error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Cache error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum CacheError {
    #[error("invalid image url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("metadata error at {}: {message}", .path.display())]
    Metadata { path: PathBuf, message: String },

    #[error("download of {url} failed: {message}")]
    Download { url: String, message: String },

    #[error("download of {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },
}

impl CacheError {
    /// Creates invalid url error.
    #[must_use]
    pub fn invalid_url(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates io error tied to a path.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates metadata error.
    #[must_use]
    pub fn metadata(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        Self::Metadata {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Creates download error.
    #[must_use]
    pub fn download(url: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Download {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Returns whether the failure came from the network side.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Download { .. } | Self::HttpStatus { .. })
    }
}
