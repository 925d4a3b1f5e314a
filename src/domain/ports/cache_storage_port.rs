//! Durable storage port definition.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::errors::CacheResult;

/// Port for the on-device storage backing the cache.
#[async_trait]
pub trait CacheStoragePort: Send + Sync {
    /// Checks whether a file or directory exists.
    async fn exists(&self, path: &Path) -> bool;

    /// Creates a directory and all missing parents.
    async fn create_dir_all(&self, path: &Path) -> CacheResult<()>;

    /// Reads a text file. Returns `None` if it does not exist.
    async fn read_to_string(&self, path: &Path) -> CacheResult<Option<String>>;

    /// Replaces a text file so readers never observe a partial write.
    async fn write_atomic(&self, path: &Path, contents: &str) -> CacheResult<()>;

    /// Lists the files directly inside a directory.
    /// A missing directory yields an empty list.
    async fn list_files(&self, dir: &Path) -> CacheResult<Vec<PathBuf>>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use crate::domain::errors::CacheError;

    /// Wraps a storage and fails selected operations on demand.
    pub struct FaultyStorage<S> {
        inner: S,
        fail_dirs: AtomicBool,
        fail_writes: AtomicBool,
    }

    impl<S> FaultyStorage<S> {
        /// Creates a wrapper that passes everything through.
        pub fn new(inner: S) -> Self {
            Self {
                inner,
                fail_dirs: AtomicBool::new(false),
                fail_writes: AtomicBool::new(false),
            }
        }

        /// Makes `create_dir_all` fail.
        pub fn fail_dirs(&self, fail: bool) {
            self.fail_dirs.store(fail, Ordering::SeqCst);
        }

        /// Makes `write_atomic` fail.
        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        fn denied(path: &Path) -> CacheError {
            CacheError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "storage is read-only"),
            )
        }
    }

    #[async_trait]
    impl<S: CacheStoragePort> CacheStoragePort for FaultyStorage<S> {
        async fn exists(&self, path: &Path) -> bool {
            self.inner.exists(path).await
        }

        async fn create_dir_all(&self, path: &Path) -> CacheResult<()> {
            if self.fail_dirs.load(Ordering::SeqCst) {
                return Err(Self::denied(path));
            }
            self.inner.create_dir_all(path).await
        }

        async fn read_to_string(&self, path: &Path) -> CacheResult<Option<String>> {
            self.inner.read_to_string(path).await
        }

        async fn write_atomic(&self, path: &Path, contents: &str) -> CacheResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(Self::denied(path));
            }
            self.inner.write_atomic(path, contents).await
        }

        async fn list_files(&self, dir: &Path) -> CacheResult<Vec<PathBuf>> {
            self.inner.list_files(dir).await
        }
    }
}
