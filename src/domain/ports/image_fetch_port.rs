//! Image download port definition.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::errors::CacheResult;

/// Port for fetching remote images onto local storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageFetchPort: Send + Sync {
    /// Downloads `url` to `dest` and returns the HTTP status code.
    ///
    /// `dest` is only written when the status is 200; on any other status
    /// an existing file at `dest` is left untouched.
    async fn download(&self, url: &str, dest: &Path) -> CacheResult<u16>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use crate::domain::errors::CacheError;

    /// In-memory image server for testing.
    pub struct FakeImageFetcher {
        bodies: Arc<RwLock<HashMap<String, Vec<u8>>>>,
        calls: Arc<AtomicUsize>,
        delay: Option<std::time::Duration>,
    }

    impl FakeImageFetcher {
        /// Creates a fetcher that answers 404 for every URL.
        pub fn new() -> Self {
            Self {
                bodies: Arc::new(RwLock::new(HashMap::new())),
                calls: Arc::new(AtomicUsize::new(0)),
                delay: None,
            }
        }

        /// Sleeps before every download.
        pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        /// Serves `body` for `url`.
        pub async fn serve(&self, url: &str, body: &[u8]) {
            self.bodies
                .write()
                .await
                .insert(url.to_string(), body.to_vec());
        }

        /// Returns how many downloads were attempted.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Default for FakeImageFetcher {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl ImageFetchPort for FakeImageFetcher {
        async fn download(&self, url: &str, dest: &Path) -> CacheResult<u16> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            let body = self.bodies.read().await.get(url).cloned();
            match body {
                Some(bytes) => {
                    tokio::fs::write(dest, bytes)
                        .await
                        .map_err(|e| CacheError::io(dest, e))?;
                    Ok(200)
                }
                None => Ok(404),
            }
        }
    }
}
