use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{MockupError, MockupResult};

/// Loads encoded image bytes for an opaque reference (path, URL, object key, ...).
pub trait ImageSource {
    /// Return the encoded bytes behind `reference`.
    fn load_bytes(&self, reference: &str) -> MockupResult<Vec<u8>>;
}

/// Persists output bytes and hands back a stable reference to them.
pub trait BlobStore {
    /// Store `bytes` under the desired `name` and return the reference callers should record.
    fn persist(&self, name: &str, bytes: &[u8]) -> MockupResult<String>;
}

/// Filesystem-backed [`ImageSource`] and [`BlobStore`] rooted at a directory.
///
/// References are normalized relative paths under the root.
#[derive(Clone, Debug)]
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    /// Create a store rooted at `root`. The directory is created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, reference: &str) -> MockupResult<(String, PathBuf)> {
        let norm = normalize_rel_path(reference)?;
        let path = self.root.join(&norm);
        Ok((norm, path))
    }
}

impl ImageSource for FsAssetStore {
    fn load_bytes(&self, reference: &str) -> MockupResult<Vec<u8>> {
        let (_, path) = self.resolve(reference)?;
        let bytes =
            std::fs::read(&path).with_context(|| format!("read asset '{}'", path.display()))?;
        Ok(bytes)
    }
}

impl BlobStore for FsAssetStore {
    fn persist(&self, name: &str, bytes: &[u8]) -> MockupResult<String> {
        let (norm, path) = self.resolve(name)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        std::fs::write(&path, bytes).with_context(|| format!("write '{}'", path.display()))?;
        tracing::debug!(reference = %norm, bytes = bytes.len(), "persisted blob");
        Ok(norm)
    }
}

/// Normalize a relative reference: backslashes become `/`, `.` segments are dropped, and absolute
/// paths or `..` segments are rejected.
pub fn normalize_rel_path(source: &str) -> MockupResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(MockupError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(MockupError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(MockupError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(MockupError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
