//! Local filesystem probe adapter.

use std::path::Path;
use zabbix_web_ports::FileProbe;

/// Probes the real filesystem of the running container.
///
/// Uses `try_exists` so that permission errors and broken symlinks count as
/// "absent" instead of surfacing as failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileProbe;

impl LocalFileProbe {
    /// Create a probe over the local filesystem.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FileProbe for LocalFileProbe {
    fn exists(&self, path: &Path) -> bool {
        match path.try_exists() {
            Ok(found) => found,
            Err(error) => {
                tracing::debug!(
                    path = %path.display(),
                    error = %error,
                    "file probe failed; treating path as absent"
                );
                false
            },
        }
    }
}
