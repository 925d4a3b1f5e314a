//! Domain entity definitions.

mod cache_entry;
mod cache_key;
mod image_handle;

pub use cache_entry::CacheEntry;
pub use cache_key::{CacheKey, KeyScope};
pub use image_handle::{LocalImageHandle, Resolution, ResolveOutcome};
