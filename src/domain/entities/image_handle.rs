//! Renderable image source returned by the cache.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// What the rendering layer gets back from a resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalImageHandle {
    /// Bytes on local storage known to match the requested URL.
    Local(PathBuf),
    /// The original URL, to be rendered straight from the network.
    Remote(String),
}

impl LocalImageHandle {
    /// Returns the string to hand to an image view.
    #[must_use]
    pub fn as_uri(&self) -> Cow<'_, str> {
        match self {
            Self::Local(path) => path.to_string_lossy(),
            Self::Remote(url) => Cow::Borrowed(url),
        }
    }

    /// Returns the local path if this is a cached image.
    #[must_use]
    pub fn local_path(&self) -> Option<&Path> {
        match self {
            Self::Local(path) => Some(path),
            Self::Remote(_) => None,
        }
    }

    /// Returns true if the cache could not serve this image.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl std::fmt::Display for LocalImageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_uri())
    }
}

/// How a resolution was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// Served from a matching local copy without network access.
    Hit,
    /// Downloaded and recorded as a fresh entry.
    Downloaded,
    /// The cache could not serve it; the remote URL is handed back.
    Fallback,
}

impl std::fmt::Display for ResolveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hit => write!(f, "hit"),
            Self::Downloaded => write!(f, "downloaded"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// A handle together with how it was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Renderable image source.
    pub handle: LocalImageHandle,
    /// Whether the cache hit, downloaded or fell back.
    pub outcome: ResolveOutcome,
}

impl Resolution {
    /// Served from cache.
    #[must_use]
    pub const fn hit(path: PathBuf) -> Self {
        Self {
            handle: LocalImageHandle::Local(path),
            outcome: ResolveOutcome::Hit,
        }
    }

    /// Freshly downloaded.
    #[must_use]
    pub const fn downloaded(path: PathBuf) -> Self {
        Self {
            handle: LocalImageHandle::Local(path),
            outcome: ResolveOutcome::Downloaded,
        }
    }

    /// Degraded to the remote URL.
    #[must_use]
    pub fn fallback(source_url: impl Into<String>) -> Self {
        Self {
            handle: LocalImageHandle::Remote(source_url.into()),
            outcome: ResolveOutcome::Fallback,
        }
    }
}
