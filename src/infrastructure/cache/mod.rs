//! Cache directory layout and metadata persistence.

pub mod layout;
pub mod metadata_store;

pub use layout::{CacheLayout, MetadataLayout};
pub use metadata_store::MetadataStore;
