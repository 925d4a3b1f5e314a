//! Metadata record for a cached image.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the metadata store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// Remote URL last known to back this entry.
    pub source_url: String,
    /// Where the downloaded bytes live.
    pub local_path: PathBuf,
    /// Refreshed on every hit.
    pub last_accessed: DateTime<Utc>,
    /// Number of hits since the last fresh download.
    pub usage_count: u64,
}

impl CacheEntry {
    /// Creates a fresh entry for a just-downloaded image.
    #[must_use]
    pub fn fresh(source_url: impl Into<String>, local_path: impl Into<PathBuf>) -> Self {
        Self {
            source_url: source_url.into(),
            local_path: local_path.into(),
            last_accessed: Utc::now(),
            usage_count: 0,
        }
    }

    /// Returns true if this entry was recorded for `source_url`.
    #[must_use]
    pub fn matches(&self, source_url: &str) -> bool {
        self.source_url == source_url
    }

    /// Records a cache hit.
    pub fn touch(&mut self) {
        self.usage_count = self.usage_count.saturating_add(1);
        self.last_accessed = Utc::now();
    }

    /// Returns the local file path.
    #[must_use]
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_entry_starts_at_zero() {
        let entry = CacheEntry::fresh("https://a/b.png", "/tmp/b.png.jpg");
        assert_eq!(entry.usage_count, 0);
        assert!(entry.matches("https://a/b.png"));
        assert!(!entry.matches("https://a/c.png"));
    }

    #[test]
    fn test_touch_bumps_usage_and_time() {
        let mut entry = CacheEntry::fresh("https://a/b.png", "/tmp/b.png.jpg");
        let before = entry.last_accessed;
        entry.touch();
        entry.touch();
        assert_eq!(entry.usage_count, 2);
        assert!(entry.last_accessed >= before);
    }

    #[test]
    fn test_serializes_camel_case() {
        let entry = CacheEntry::fresh("https://a/b.png", "/tmp/b.png.jpg");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["sourceUrl"], "https://a/b.png");
        assert_eq!(json["localPath"], "/tmp/b.png.jpg");
        assert_eq!(json["usageCount"], 0);
        assert!(json["lastAccessed"].is_string());
    }
}
