//! Resource identities, identity hashing and the on-disk cache layout.

use std::path::{Path, PathBuf};

use sha2::Digest as _;

use crate::foundation::error::{SvgaError, SvgaResult};

/// File extension appended to named resources.
pub const BUNDLE_EXTENSION: &str = "svga";

const FILE_SCHEME: &str = "file://";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
/// Logical resource a caller asks the loader for.
pub enum Source {
    /// `http(s)://` URL fetched over the network, or `file://` URL read from disk.
    Url(String),
    /// Local bundle `<root>/<name>.svga`.
    Named {
        /// Bundle name without extension.
        name: String,
        /// Search root; falls back to the loader's resource root when absent.
        root: Option<PathBuf>,
    },
}

impl Source {
    /// Shorthand for [`Source::Url`].
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// Shorthand for a [`Source::Named`] resolved against the loader's resource root.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            root: None,
        }
    }

    /// Shorthand for a [`Source::Named`] with an explicit search root.
    pub fn named_in(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self::Named {
            name: name.into(),
            root: Some(root.into()),
        }
    }

    /// Resolve to a concrete location.
    pub fn locate(&self, default_root: &Path) -> SvgaResult<Location> {
        match self {
            Self::Url(url) if url.is_empty() => Err(SvgaError::validation("empty url")),
            Self::Url(url) => Ok(match url.strip_prefix(FILE_SCHEME) {
                Some(path) => Location::File(PathBuf::from(path)),
                None => Location::Remote(url.clone()),
            }),
            Self::Named { name, .. } if name.is_empty() => {
                Err(SvgaError::validation("empty resource name"))
            }
            Self::Named { name, root } => {
                let root = root.as_deref().unwrap_or(default_root);
                Ok(Location::File(
                    root.join(format!("{name}.{BUNDLE_EXTENSION}")),
                ))
            }
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::Named { name, root: None } => write!(f, "{name}"),
            Self::Named {
                name,
                root: Some(root),
            } => write!(f, "{}/{name}", root.display()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Concrete place a [`Source`] resolves to.
pub enum Location {
    /// Network URL.
    Remote(String),
    /// Local file path.
    File(PathBuf),
}

impl Location {
    /// Canonical identity string hashed into the cache key.
    pub fn identity(&self) -> String {
        match self {
            Self::Remote(url) => url.clone(),
            Self::File(path) => format!("{FILE_SCHEME}{}", path.display()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Lowercase hex SHA-256 of a canonical identity.
pub struct CacheKey(String);

impl CacheKey {
    /// Hash `identity`.
    pub fn for_identity(identity: &str) -> Self {
        Self(sha256_hex(identity.as_bytes()))
    }

    /// Hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

#[derive(Clone, Debug)]
/// Per-identity directories under a cache root.
pub struct DiskCache {
    root: PathBuf,
}

impl DiskCache {
    /// Layout rooted at `root`. Nothing is created until a directory is requested.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for `key`.
    pub fn dir(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.as_str())
    }

    /// Create the directory for `key` if needed and return it.
    pub fn ensure_dir(&self, key: &CacheKey) -> SvgaResult<PathBuf> {
        let dir = self.dir(key);
        std::fs::create_dir_all(&dir)
            .map_err(|e| SvgaError::io(format!("create '{}'", dir.display()), e))?;
        Ok(dir)
    }

    /// Remove the directory for `key`. A missing directory is not an error.
    pub fn purge(&self, key: &CacheKey) -> SvgaResult<()> {
        let dir = self.dir(key);
        match std::fs::remove_dir_all(&dir) {
            Ok(()) => {
                tracing::debug!(key = %key, "purged cache directory");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SvgaError::io(format!("remove '{}'", dir.display()), e)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/key.rs"]
mod tests;
