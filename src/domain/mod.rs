//! Domain layer with core cache entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{CacheEntry, CacheKey, KeyScope, LocalImageHandle, Resolution, ResolveOutcome};
pub use errors::{CacheError, CacheResult};
pub use ports::{CacheStoragePort, ImageCachePort, ImageFetchPort};
