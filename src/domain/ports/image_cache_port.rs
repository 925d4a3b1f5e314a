//! Port definition for the image cache.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::entities::{CacheEntry, CacheKey, LocalImageHandle, Resolution};
use crate::domain::errors::CacheResult;

/// Port for resolving remote images to local copies.
/// Implementations must be thread-safe.
#[async_trait]
pub trait ImageCachePort: Send + Sync {
    /// Resolves an image and reports how it was served.
    /// Never fails; cache problems degrade to the remote URL.
    async fn resolve_with_outcome(&self, source_url: &str, owner_key: Option<&str>)
    -> Resolution;

    /// Returns a renderable source for `source_url`, downloading it first
    /// if no valid local copy exists.
    async fn resolve(&self, source_url: &str, owner_key: Option<&str>) -> LocalImageHandle {
        self.resolve_with_outcome(source_url, owner_key)
            .await
            .handle
    }

    /// Returns the local copy only if one is valid for `source_url`.
    /// Does no network access and records no usage.
    async fn lookup(&self, source_url: &str, owner_key: Option<&str>) -> Option<PathBuf>;

    /// Downloads `source_url` unconditionally and records a fresh entry.
    async fn refresh(&self, source_url: &str, owner_key: Option<&str>) -> CacheResult<PathBuf>;

    /// Returns every recorded entry, sorted by key.
    async fn entries(&self) -> Vec<(CacheKey, CacheEntry)>;
}
