//! Wishcache - on-device image cache for the wishlist app.
//!
//! This crate resolves remote image URLs (avatars, event pictures) to local
//! copies on durable storage, tracking provenance and usage in a JSON
//! metadata store and falling back to the remote URL whenever caching fails.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing storage, network and config adapters.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "wishcache";
