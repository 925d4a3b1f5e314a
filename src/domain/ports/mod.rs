mod cache_storage_port;
mod image_cache_port;
mod image_fetch_port;

pub use cache_storage_port::CacheStoragePort;
pub use image_cache_port::ImageCachePort;
pub use image_fetch_port::ImageFetchPort;

#[cfg(test)]
pub mod mocks {
    pub use super::cache_storage_port::mock::FaultyStorage;
    pub use super::image_fetch_port::MockImageFetchPort;
    pub use super::image_fetch_port::mock::FakeImageFetcher;
}
