//! Read-through image cache.
//!
//! Resolves a remote URL to a local file: metadata hit first, then network.
//! Every failure on the resolve path degrades to handing back the remote URL.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, trace, warn};
use url::Url;

use crate::domain::entities::{CacheEntry, CacheKey, Resolution};
use crate::domain::errors::{CacheError, CacheResult};
use crate::domain::ports::{CacheStoragePort, ImageCachePort, ImageFetchPort};
use crate::infrastructure::cache::{CacheLayout, MetadataStore};

/// HTTP status the fetcher must report for a download to count.
const STATUS_OK: u16 = 200;

/// Image cache over injected storage and fetcher.
pub struct ImageCache {
    storage: Arc<dyn CacheStoragePort>,
    fetcher: Arc<dyn ImageFetchPort>,
    metadata: MetadataStore,
    key_locks: KeyLocks,
}

type KeyLocks = parking_lot::Mutex<HashMap<CacheKey, Arc<Mutex<()>>>>;

/// Holds the per-key lock and drops its map slot once nobody else uses it.
struct KeyGuard<'a> {
    locks: &'a KeyLocks,
    key: CacheKey,
    lock: Arc<Mutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = self.locks.lock();
        // The map and this guard are the only holders left.
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.key);
        }
    }
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl ImageCache {
    /// Creates a cache rooted at `layout`.
    #[must_use]
    pub fn new(
        storage: Arc<dyn CacheStoragePort>,
        fetcher: Arc<dyn ImageFetchPort>,
        layout: CacheLayout,
    ) -> Self {
        Self {
            metadata: MetadataStore::new(storage.clone(), layout),
            storage,
            fetcher,
            key_locks: parking_lot::Mutex::new(HashMap::new()),
        }
    }

    /// Returns the on-disk layout.
    #[must_use]
    pub const fn layout(&self) -> &CacheLayout {
        self.metadata.layout()
    }

    /// Creates the cache directories if they are missing.
    ///
    /// # Errors
    /// Returns error if a directory cannot be created.
    pub async fn ensure_dirs(&self) -> CacheResult<()> {
        for dir in self.layout().required_dirs() {
            if !self.storage.exists(&dir).await {
                debug!(path = %dir.display(), "Creating cache directory");
                self.storage.create_dir_all(&dir).await?;
            }
        }
        Ok(())
    }

    fn key_for(source_url: &str, owner_key: Option<&str>) -> CacheResult<CacheKey> {
        let url = Url::parse(source_url).map_err(|e| CacheError::invalid_url(source_url, e))?;
        if url.cannot_be_a_base() {
            return Err(CacheError::invalid_url(source_url, "not a hierarchical URL"));
        }

        Ok(CacheKey::derive(&url, owner_key))
    }

    async fn lock_key(&self, key: &CacheKey) -> KeyGuard<'_> {
        let lock = self
            .key_locks
            .lock()
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = lock.clone().lock_owned().await;

        KeyGuard {
            locks: &self.key_locks,
            key: key.clone(),
            lock,
            guard: Some(guard),
        }
    }

    /// Returns the entry for `key` if it matches the URL and its file exists.
    async fn valid_entry(&self, key: &CacheKey, source_url: &str) -> Option<CacheEntry> {
        let entry = self.metadata.get(key).await?;

        if !entry.matches(source_url) {
            debug!(key = %key, stale = %entry.source_url, "Source URL changed");
            return None;
        }
        if !self.storage.exists(entry.local_path()).await {
            debug!(key = %key, path = %entry.local_path().display(), "Cached file missing");
            return None;
        }
        Some(entry)
    }

    async fn try_hit(&self, key: &CacheKey, source_url: &str) -> Option<PathBuf> {
        let entry = self.valid_entry(key, source_url).await?;

        match self.metadata.record_hit(key, source_url).await {
            Ok(Some(updated)) => {
                trace!(key = %key, usage = updated.usage_count, "Cache hit");
                Some(updated.local_path)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to record cache hit");
                Some(entry.local_path)
            }
        }
    }

    async fn fetch(&self, key: &CacheKey, source_url: &str) -> CacheResult<PathBuf> {
        let dest = self.layout().image_path(key);
        debug!(key = %key, url = %source_url, "Image not cached, downloading");

        let status = self.fetcher.download(source_url, &dest).await?;
        if status != STATUS_OK {
            return Err(CacheError::HttpStatus {
                url: source_url.to_string(),
                status,
            });
        }

        self.metadata
            .put(key, CacheEntry::fresh(source_url, dest.clone()))
            .await?;

        info!(key = %key, path = %dest.display(), "Cached image");
        Ok(dest)
    }
}

#[async_trait]
impl ImageCachePort for ImageCache {
    async fn resolve_with_outcome(
        &self,
        source_url: &str,
        owner_key: Option<&str>,
    ) -> Resolution {
        if let Err(e) = self.ensure_dirs().await {
            warn!(error = %e, "Failed to set up cache directories");
        }

        let key = match Self::key_for(source_url, owner_key) {
            Ok(key) => key,
            Err(e) => {
                warn!(error = %e, "Cannot cache image");
                return Resolution::fallback(source_url);
            }
        };

        let _guard = self.lock_key(&key).await;

        if let Some(path) = self.try_hit(&key, source_url).await {
            return Resolution::hit(path);
        }

        match self.fetch(&key, source_url).await {
            Ok(path) => Resolution::downloaded(path),
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to cache image, using remote URL");
                Resolution::fallback(source_url)
            }
        }
    }

    async fn lookup(&self, source_url: &str, owner_key: Option<&str>) -> Option<PathBuf> {
        let key = Self::key_for(source_url, owner_key).ok()?;
        self.valid_entry(&key, source_url)
            .await
            .map(|entry| entry.local_path)
    }

    async fn refresh(&self, source_url: &str, owner_key: Option<&str>) -> CacheResult<PathBuf> {
        self.ensure_dirs().await?;
        let key = Self::key_for(source_url, owner_key)?;

        let _guard = self.lock_key(&key).await;
        self.fetch(&key, source_url).await
    }

    async fn entries(&self) -> Vec<(CacheKey, CacheEntry)> {
        self.metadata.entries().await
    }
}
