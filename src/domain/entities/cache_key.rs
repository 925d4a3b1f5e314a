//! Cache key derivation.

use sha2::{Digest, Sha256};
use url::Url;

/// Prefix marking owner-scoped keys in metadata files.
const OWNER_PREFIX: &str = "user:";

/// Length of a hashed key name: 16 bytes, hex-encoded.
const HASHED_LEN: usize = 32;

/// Where a key came from. Keys of different scopes never share storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyScope {
    /// Derived from the final path segment of the source URL.
    Url,
    /// Supplied explicitly as an owner id.
    Owner,
}

/// Identifier indexing the metadata store and naming the cached file.
///
/// Either supplied explicitly as an owner id or derived from the final
/// path segment of the source URL. The name is always safe to use as a file
/// name, and distinct inputs within a scope always yield distinct names:
/// inputs that are not already file-safe are replaced by their hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    scope: KeyScope,
    name: String,
}

impl CacheKey {
    /// Derives the key for a request.
    ///
    /// `owner_key` wins when present; otherwise the last path segment of
    /// `url` is used, falling back to a URL hash when the path has none.
    #[must_use]
    pub fn derive(url: &Url, owner_key: Option<&str>) -> Self {
        if let Some(owner) = owner_key.map(str::trim).filter(|o| !o.is_empty()) {
            return Self {
                scope: KeyScope::Owner,
                name: file_safe_name(owner),
            };
        }

        let segment = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default();

        if segment.is_empty() {
            return Self::from_url_hash(url);
        }
        Self {
            scope: KeyScope::Url,
            name: file_safe_name(segment),
        }
    }

    /// Creates a key from a URL hash.
    #[must_use]
    pub fn from_url_hash(url: &Url) -> Self {
        Self {
            scope: KeyScope::Url,
            name: hashed(url.as_str()),
        }
    }

    /// Reconstructs a key from its metadata record form.
    ///
    /// Returns `None` if the name is not a valid file-safe key.
    #[must_use]
    pub fn parse(record: &str) -> Option<Self> {
        let (scope, name) = match record.strip_prefix(OWNER_PREFIX) {
            Some(name) => (KeyScope::Owner, name),
            None => (KeyScope::Url, record),
        };
        is_file_safe(name).then(|| Self {
            scope,
            name: name.to_string(),
        })
    }

    /// Returns the file-safe name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns where the key came from.
    #[must_use]
    pub const fn scope(&self) -> KeyScope {
        self.scope
    }

    /// Returns true for owner-scoped keys.
    #[must_use]
    pub fn is_owned(&self) -> bool {
        self.scope == KeyScope::Owner
    }
}

/// Record form used in metadata files: `user:<name>` for owners, the bare
/// name otherwise.
impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.scope {
            KeyScope::Url => write!(f, "{}", self.name),
            KeyScope::Owner => write!(f, "{OWNER_PREFIX}{}", self.name),
        }
    }
}

/// Keeps `raw` if it is a file-safe name that cannot be mistaken for a hash,
/// otherwise hashes it.
fn file_safe_name(raw: &str) -> String {
    if is_file_safe(raw) && !looks_hashed(raw) {
        raw.to_string()
    } else {
        hashed(raw)
    }
}

fn hashed(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..HASHED_LEN / 2])
}

fn is_file_safe(name: &str) -> bool {
    !name.is_empty()
        && !name.chars().all(|c| c == '.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

fn looks_hashed(name: &str) -> bool {
    name.len() == HASHED_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, 'a'..='f'))
}
