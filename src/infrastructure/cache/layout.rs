//! On-disk layout of the cache directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::entities::{CacheKey, KeyScope};

const IMAGES_DIR: &str = "images";
const OWNER_IMAGES_DIR: &str = "users";
const METADATA_DIR: &str = "metadata";
const SHARED_METADATA_FILE: &str = "metadata.json";

/// Where metadata entries are persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MetadataLayout {
    /// Every entry in one `metadata.json`.
    #[default]
    Shared,
    /// Owner-keyed entries get their own file under `metadata/`.
    PerOwner,
}

impl std::fmt::Display for MetadataLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shared => write!(f, "shared"),
            Self::PerOwner => write!(f, "per_owner"),
        }
    }
}

/// Resolves every path the cache reads or writes.
#[derive(Debug, Clone)]
pub struct CacheLayout {
    root: PathBuf,
    image_extension: String,
    metadata_layout: MetadataLayout,
}

impl CacheLayout {
    /// Creates a layout rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            image_extension: "jpg".to_string(),
            metadata_layout: MetadataLayout::default(),
        }
    }

    /// Sets the extension appended to cached image files.
    #[must_use]
    pub fn with_image_extension(mut self, ext: impl Into<String>) -> Self {
        let ext = ext.into();
        let ext = ext.trim_start_matches('.');
        if !ext.is_empty() {
            self.image_extension = ext.to_string();
        }
        self
    }

    /// Sets the metadata file layout.
    #[must_use]
    pub const fn with_metadata_layout(mut self, layout: MetadataLayout) -> Self {
        self.metadata_layout = layout;
        self
    }

    /// Returns the cache root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the metadata layout in use.
    #[must_use]
    pub const fn metadata_layout(&self) -> MetadataLayout {
        self.metadata_layout
    }

    /// Directory holding downloaded image files.
    #[must_use]
    pub fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES_DIR)
    }

    /// Directory holding images of owner-scoped keys.
    #[must_use]
    pub fn owner_images_dir(&self) -> PathBuf {
        self.images_dir().join(OWNER_IMAGES_DIR)
    }

    /// Directory holding per-owner metadata files.
    #[must_use]
    pub fn owner_metadata_dir(&self) -> PathBuf {
        self.root.join(METADATA_DIR)
    }

    /// Shared metadata file.
    #[must_use]
    pub fn shared_metadata_path(&self) -> PathBuf {
        self.root.join(SHARED_METADATA_FILE)
    }

    /// Directories that must exist before the cache is used.
    #[must_use]
    pub fn required_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = vec![
            self.root.clone(),
            self.images_dir(),
            self.owner_images_dir(),
        ];
        if self.metadata_layout == MetadataLayout::PerOwner {
            dirs.push(self.owner_metadata_dir());
        }
        dirs
    }

    /// Deterministic image file path for a key.
    ///
    /// Owner keys live in their own directory so they never share a file
    /// with a URL key of the same name.
    #[must_use]
    pub fn image_path(&self, key: &CacheKey) -> PathBuf {
        let dir = match key.scope() {
            KeyScope::Url => self.images_dir(),
            KeyScope::Owner => self.owner_images_dir(),
        };
        dir.join(format!("{}.{}", key.name(), self.image_extension))
    }

    /// Metadata file holding the entry for `key`.
    #[must_use]
    pub fn metadata_path(&self, key: &CacheKey) -> PathBuf {
        if key.is_owned() && self.metadata_layout == MetadataLayout::PerOwner {
            self.owner_metadata_dir()
                .join(format!("user_{}_metadata.json", key.name()))
        } else {
            self.shared_metadata_path()
        }
    }
}
