//! JSON-backed metadata store.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

use super::layout::CacheLayout;
use crate::domain::entities::{CacheEntry, CacheKey};
use crate::domain::errors::{CacheError, CacheResult};
use crate::domain::ports::CacheStoragePort;

type MetadataMap = BTreeMap<String, CacheEntry>;

/// Maps cache keys to entries, persisted as JSON objects.
///
/// All read-modify-write cycles go through one writer lock and every file
/// is replaced atomically, so concurrent updates in this process are never
/// lost.
pub struct MetadataStore {
    storage: Arc<dyn CacheStoragePort>,
    layout: CacheLayout,
    writer: Mutex<()>,
}

impl std::fmt::Debug for MetadataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataStore")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl MetadataStore {
    /// Creates a store over the given storage and layout.
    #[must_use]
    pub fn new(storage: Arc<dyn CacheStoragePort>, layout: CacheLayout) -> Self {
        Self {
            storage,
            layout,
            writer: Mutex::new(()),
        }
    }

    /// Returns the layout this store writes to.
    #[must_use]
    pub const fn layout(&self) -> &CacheLayout {
        &self.layout
    }

    /// Looks up an entry. Unreadable metadata reads as empty.
    pub async fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        let path = self.layout.metadata_path(key);
        self.load_or_empty(&path).await.remove(&key.to_string())
    }

    /// Records a hit on `key` if its entry still matches `source_url`.
    ///
    /// Returns the updated entry, or `None` if there was no matching entry.
    ///
    /// # Errors
    /// Returns error if the updated metadata cannot be written.
    pub async fn record_hit(
        &self,
        key: &CacheKey,
        source_url: &str,
    ) -> CacheResult<Option<CacheEntry>> {
        let _guard = self.writer.lock().await;
        let path = self.layout.metadata_path(key);
        let mut map = self.load_or_empty(&path).await;

        let Some(entry) = map.get_mut(&key.to_string()).filter(|e| e.matches(source_url)) else {
            return Ok(None);
        };
        entry.touch();
        let updated = entry.clone();

        self.save(&path, &map).await?;
        trace!(key = %key, usage = updated.usage_count, "Recorded cache hit");
        Ok(Some(updated))
    }

    /// Inserts or replaces the entry for `key`.
    ///
    /// # Errors
    /// Returns error if the metadata cannot be written.
    pub async fn put(&self, key: &CacheKey, entry: CacheEntry) -> CacheResult<()> {
        let _guard = self.writer.lock().await;
        let path = self.layout.metadata_path(key);
        let mut map = self.load_or_empty(&path).await;

        map.insert(key.to_string(), entry);
        self.save(&path, &map).await?;
        debug!(key = %key, path = %path.display(), "Stored metadata entry");
        Ok(())
    }

    /// Returns every entry across all metadata files, sorted by key.
    ///
    /// Owner keys and URL keys with the same name are listed separately.
    pub async fn entries(&self) -> Vec<(CacheKey, CacheEntry)> {
        let mut files = vec![self.layout.shared_metadata_path()];
        match self
            .storage
            .list_files(&self.layout.owner_metadata_dir())
            .await
        {
            Ok(owner_files) => files.extend(
                owner_files
                    .into_iter()
                    .filter(|p| p.extension().is_some_and(|ext| ext == "json")),
            ),
            Err(e) => warn!(error = %e, "Failed to list owner metadata files"),
        }

        let mut all = BTreeMap::new();
        for path in files {
            for (raw, entry) in self.load_or_empty(&path).await {
                match CacheKey::parse(&raw) {
                    Some(key) => {
                        all.insert(key, entry);
                    }
                    None => warn!(key = %raw, path = %path.display(), "Skipping invalid key"),
                }
            }
        }
        all.into_iter().collect()
    }

    async fn load(&self, path: &Path) -> CacheResult<MetadataMap> {
        let Some(content) = self.storage.read_to_string(path).await? else {
            return Ok(MetadataMap::new());
        };
        serde_json::from_str(&content).map_err(|e| CacheError::metadata(path, e))
    }

    async fn load_or_empty(&self, path: &Path) -> MetadataMap {
        match self.load(path).await {
            Ok(map) => map,
            Err(e) => {
                warn!(error = %e, "Failed to read metadata, treating as empty");
                MetadataMap::new()
            }
        }
    }

    async fn save(&self, path: &Path, map: &MetadataMap) -> CacheResult<()> {
        let content = serde_json::to_string(map).map_err(|e| CacheError::metadata(path, e))?;
        self.storage.write_atomic(path, &content).await
    }
}
