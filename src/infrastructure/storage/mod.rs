//! Durable storage adapters.

mod local_fs;

pub use local_fs::LocalFileStorage;
