//! Filesystem boundary contract.

use std::path::Path;

/// Capability to test whether a path exists on the local filesystem.
///
/// Implementations MUST NOT fail: an unreadable or invalid path simply does
/// not exist as far as configuration resolution is concerned. Probing is
/// treated as instantaneous and side-effect free.
pub trait FileProbe: Send + Sync {
    /// Returns true when `path` names an existing filesystem entry.
    fn exists(&self, path: &Path) -> bool;

    /// Convenience: probe a string path. Empty strings never exist.
    fn exists_str(&self, path: &str) -> bool {
        !path.is_empty() && self.exists(Path::new(path))
    }
}

impl<T> FileProbe for &T
where
    T: FileProbe + ?Sized,
{
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }
}
