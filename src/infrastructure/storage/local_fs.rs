//! Local filesystem adapter for the cache storage port.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::trace;

use crate::domain::errors::{CacheError, CacheResult};
use crate::domain::ports::CacheStoragePort;

/// Cache storage backed by `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileStorage;

impl LocalFileStorage {
    /// Creates a new local storage adapter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CacheStoragePort for LocalFileStorage {
    async fn exists(&self, path: &Path) -> bool {
        fs::try_exists(path).await.unwrap_or(false)
    }

    async fn create_dir_all(&self, path: &Path) -> CacheResult<()> {
        fs::create_dir_all(path)
            .await
            .map_err(|e| CacheError::io(path, e))
    }

    async fn read_to_string(&self, path: &Path) -> CacheResult<Option<String>> {
        match fs::read_to_string(path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::io(path, e)),
        }
    }

    async fn write_atomic(&self, path: &Path, contents: &str) -> CacheResult<()> {
        let path = path.to_path_buf();
        let contents = contents.to_owned();

        let result = tokio::task::spawn_blocking(move || -> CacheResult<()> {
            let parent = path
                .parent()
                .ok_or_else(|| CacheError::io(&path, std::io::Error::other("Invalid path")))?;

            let mut temp_file =
                tempfile::NamedTempFile::new_in(parent).map_err(|e| CacheError::io(parent, e))?;
            temp_file
                .write_all(contents.as_bytes())
                .map_err(|e| CacheError::io(temp_file.path(), e))?;
            temp_file
                .persist(&path)
                .map_err(|e| CacheError::io(&path, e.error))?;

            trace!(path = %path.display(), "Wrote file atomically");
            Ok(())
        })
        .await;

        result.map_err(|e| CacheError::io(PathBuf::new(), std::io::Error::other(e)))?
    }

    async fn list_files(&self, dir: &Path) -> CacheResult<Vec<PathBuf>> {
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CacheError::io(dir, e)),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CacheError::io(dir, e))?
        {
            if entry.file_type().await.is_ok_and(|t| t.is_file()) {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }
}
