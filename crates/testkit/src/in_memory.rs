//! In-memory adapters for port traits.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use zabbix_web_ports::FileProbe;

/// File probe backed by a fixed set of paths.
///
/// Paths are compared exactly; no normalization or symlink resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryFileProbe {
    paths: BTreeSet<PathBuf>,
}

impl InMemoryFileProbe {
    /// Create an empty probe (no path exists).
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a probe where `path` also exists.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(path.into());
        self
    }

    /// Number of existing paths.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns true when no path exists.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<P> FromIterator<P> for InMemoryFileProbe
where
    P: Into<PathBuf>,
{
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl FileProbe for InMemoryFileProbe {
    fn exists(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }
}
