//! Image resolution DTOs.

/// A request to resolve one remote image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    /// Remote image URL.
    pub source_url: String,
    /// Owner id namespacing the cache entry.
    pub owner_key: Option<String>,
}

impl ResolveRequest {
    /// Creates a request keyed by the URL's file name.
    #[must_use]
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            owner_key: None,
        }
    }

    /// Namespaces the request under an owner id.
    #[must_use]
    pub fn owned_by(mut self, owner_key: impl Into<String>) -> Self {
        self.owner_key = Some(owner_key.into());
        self
    }

    /// Returns the owner key, if any.
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.owner_key.as_deref()
    }
}
