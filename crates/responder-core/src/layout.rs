//! Workspace layout provisioning.
//!
//! The service expects `logs/`, `db/`, and `keys/` to exist under the
//! working directory before it starts: log files, the webhook-tracking
//! database, and API key material all live there. The bootstrap guarantees
//! presence only -- the contents of each directory are owned by the
//! service.

use std::path::PathBuf;

use crate::error::BootstrapError;

/// Directory names the service requires under the working directory.
pub const REQUIRED_DIRS: [&str; 3] = ["logs", "db", "keys"];

/// The set of directories to provision under a base directory.
#[derive(Debug, Clone)]
pub struct WorkspaceLayout {
    base: PathBuf,
    dirs: Vec<String>,
}

impl WorkspaceLayout {
    /// Layout with the fixed required directories.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            dirs: REQUIRED_DIRS.iter().map(|d| d.to_string()).collect(),
        }
    }

    /// Append extra directories from the bootstrap configuration.
    ///
    /// Duplicates of the required set are skipped so a config listing
    /// `logs` again does not provision it twice.
    pub fn with_extra_dirs(mut self, extra: &[String]) -> Self {
        for dir in extra {
            if !self.dirs.iter().any(|d| d == dir) {
                self.dirs.push(dir.clone());
            }
        }
        self
    }

    /// The directory names this layout provisions, in order.
    pub fn dir_names(&self) -> &[String] {
        &self.dirs
    }

    /// Create every missing directory; succeed silently for existing ones.
    ///
    /// Idempotent and safe under concurrent invocation: a directory that
    /// appears between the existence check and the create (another
    /// bootstrap run racing this one) counts as success. Existing
    /// directory contents are never touched.
    ///
    /// # Errors
    ///
    /// [`BootstrapError::DirectoryConflict`] when a path exists but is not
    /// a directory, [`BootstrapError::DirectoryCreate`] for any other
    /// creation failure (permissions, disk full). Both abort the bootstrap
    /// before the service launch -- the service cannot be assumed to
    /// function without its required directories.
    pub async fn ensure(&self) -> Result<(), BootstrapError> {
        for name in &self.dirs {
            let path = self.base.join(name);
            match tokio::fs::metadata(&path).await {
                Ok(meta) if meta.is_dir() => continue,
                Ok(_) => return Err(BootstrapError::DirectoryConflict { path }),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(source) => return Err(BootstrapError::DirectoryCreate { path, source }),
            }

            match tokio::fs::create_dir_all(&path).await {
                Ok(()) => tracing::debug!("created required directory '{}'", path.display()),
                Err(source) => {
                    // A concurrent bootstrap may have created it first.
                    match tokio::fs::metadata(&path).await {
                        Ok(meta) if meta.is_dir() => {}
                        Ok(_) => return Err(BootstrapError::DirectoryConflict { path }),
                        Err(_) => return Err(BootstrapError::DirectoryCreate { path, source }),
                    }
                }
            }
        }
        Ok(())
    }
}
