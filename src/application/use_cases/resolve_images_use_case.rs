//! Image resolution use case.

use std::path::PathBuf;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::application::dto::ResolveRequest;
use crate::domain::entities::{CacheEntry, CacheKey, Resolution, ResolveOutcome};
use crate::domain::errors::CacheResult;
use crate::domain::ports::ImageCachePort;

/// Resolves images for screens that show one or many of them.
#[derive(Clone)]
pub struct ResolveImagesUseCase {
    cache: Arc<dyn ImageCachePort>,
    max_concurrent: usize,
}

impl ResolveImagesUseCase {
    /// Creates the use case. `max_concurrent` bounds batch resolutions in flight.
    #[must_use]
    pub fn new(cache: Arc<dyn ImageCachePort>, max_concurrent: usize) -> Self {
        Self {
            cache,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Resolves one image.
    pub async fn execute(&self, request: &ResolveRequest) -> Resolution {
        let resolution = self
            .cache
            .resolve_with_outcome(&request.source_url, request.owner())
            .await;

        match resolution.outcome {
            ResolveOutcome::Fallback => {
                warn!(url = %request.source_url, "Serving image from network");
            }
            outcome => debug!(url = %request.source_url, %outcome, "Resolved image"),
        }
        resolution
    }

    /// Resolves many images, returning results in request order.
    pub async fn execute_batch(&self, requests: Vec<ResolveRequest>) -> Vec<Resolution> {
        let total = requests.len();
        let resolutions: Vec<Resolution> = stream::iter(requests)
            .map(|request| async move { self.execute(&request).await })
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let fallbacks = resolutions
            .iter()
            .filter(|r| r.outcome == ResolveOutcome::Fallback)
            .count();
        info!(total, fallbacks, "Resolved image batch");
        resolutions
    }

    /// Returns the cached path without network access.
    pub async fn lookup(&self, request: &ResolveRequest) -> Option<PathBuf> {
        self.cache
            .lookup(&request.source_url, request.owner())
            .await
    }

    /// Downloads the image again.
    ///
    /// # Errors
    /// Returns error if the URL is invalid or the download or metadata write fails.
    pub async fn refresh(&self, request: &ResolveRequest) -> CacheResult<PathBuf> {
        self.cache
            .refresh(&request.source_url, request.owner())
            .await
            .inspect_err(|e| warn!(url = %request.source_url, error = %e, "Refresh failed"))
    }

    /// Returns every cache entry.
    pub async fn entries(&self) -> Vec<(CacheKey, CacheEntry)> {
        self.cache.entries().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::domain::errors::CacheError;

    /// Records how many resolutions run at once.
    #[derive(Default)]
    struct RecordingCache {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl ImageCachePort for RecordingCache {
        async fn resolve_with_outcome(
            &self,
            source_url: &str,
            owner_key: Option<&str>,
        ) -> Resolution {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match owner_key {
                Some(owner) => Resolution::hit(PathBuf::from(format!("/c/images/users/{owner}.jpg"))),
                None => Resolution::fallback(source_url),
            }
        }

        async fn lookup(&self, _source_url: &str, _owner_key: Option<&str>) -> Option<PathBuf> {
            None
        }

        async fn refresh(
            &self,
            source_url: &str,
            _owner_key: Option<&str>,
        ) -> CacheResult<PathBuf> {
            Err(CacheError::HttpStatus {
                url: source_url.to_string(),
                status: 500,
            })
        }

        async fn entries(&self) -> Vec<(CacheKey, CacheEntry)> {
            Vec::new()
        }
    }

    #[tokio::test]
    async fn test_execute_passes_owner() {
        let use_case = ResolveImagesUseCase::new(Arc::new(RecordingCache::default()), 4);

        let owned = use_case
            .execute(&ResolveRequest::new("https://cdn.example.com/a.png").owned_by("7"))
            .await;
        assert_eq!(owned.outcome, ResolveOutcome::Hit);
        assert_eq!(owned.handle.to_string(), "/c/images/users/7.jpg");

        let plain = use_case
            .execute(&ResolveRequest::new("https://cdn.example.com/a.png"))
            .await;
        assert_eq!(plain.outcome, ResolveOutcome::Fallback);
    }

    #[tokio::test]
    async fn test_batch_keeps_order_and_bounds_concurrency() {
        let cache = Arc::new(RecordingCache::default());
        let use_case = ResolveImagesUseCase::new(cache.clone(), 2);

        let requests: Vec<ResolveRequest> = (0..6)
            .map(|i| ResolveRequest::new(format!("https://cdn.example.com/{i}.png")))
            .collect();
        let resolutions = use_case.execute_batch(requests).await;

        let uris: Vec<String> = resolutions.iter().map(|r| r.handle.to_string()).collect();
        let expected: Vec<String> = (0..6)
            .map(|i| format!("https://cdn.example.com/{i}.png"))
            .collect();
        assert_eq!(uris, expected);
        assert!(cache.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_clamped() {
        let use_case = ResolveImagesUseCase::new(Arc::new(RecordingCache::default()), 0);
        let resolutions = use_case
            .execute_batch(vec![ResolveRequest::new("https://cdn.example.com/a.png")])
            .await;
        assert_eq!(resolutions.len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_propagates_error() {
        let use_case = ResolveImagesUseCase::new(Arc::new(RecordingCache::default()), 1);
        let err = use_case
            .refresh(&ResolveRequest::new("https://cdn.example.com/a.png"))
            .await
            .unwrap_err();
        assert!(err.is_network_error());
    }
}
