//! Working-directory resolution.
//!
//! The bootstrap anchors every relative path to the directory holding its
//! own executable, so the service starts with a known, stable working
//! directory regardless of where the operator invoked it from.

use std::path::{Path, PathBuf};

use crate::error::BootstrapError;

/// The resolved base directory of the installation.
///
/// Constructed once at startup; all layout provisioning, config loading,
/// and entry-point resolution happen relative to it.
#[derive(Debug, Clone)]
pub struct Workdir {
    base: PathBuf,
}

impl Workdir {
    /// Resolve the base directory from the bootstrap binary's own location.
    ///
    /// The executable path is canonicalized before taking its parent, so a
    /// symlinked install still resolves to the real installation directory.
    ///
    /// # Errors
    ///
    /// This is the only fatal precondition before provisioning: an
    /// unresolvable path means no known working directory, and the
    /// bootstrap cannot proceed.
    pub fn resolve() -> Result<Self, BootstrapError> {
        let exe = std::env::current_exe().map_err(BootstrapError::LocateExecutable)?;
        let exe = exe
            .canonicalize()
            .map_err(|source| BootstrapError::Canonicalize {
                path: exe.clone(),
                source,
            })?;
        let base = exe
            .parent()
            .ok_or_else(|| BootstrapError::NoBaseDirectory { path: exe.clone() })?
            .to_path_buf();
        Ok(Self { base })
    }

    /// Build a workdir from an explicit base directory.
    pub fn from_base(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Make the base directory the process working directory.
    ///
    /// All subsequent relative filesystem operations -- in the bootstrap
    /// and in the launched service -- resolve against it.
    pub fn enter(&self) -> Result<(), BootstrapError> {
        std::env::set_current_dir(&self.base).map_err(|source| BootstrapError::EnterWorkdir {
            path: self.base.clone(),
            source,
        })
    }

    /// The resolved base directory.
    pub fn base(&self) -> &Path {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn resolve_yields_an_absolute_directory() {
        let workdir = Workdir::resolve().unwrap();
        assert!(workdir.base().is_absolute());
        assert!(workdir.base().is_dir());
    }

    #[test]
    fn enter_changes_the_process_working_directory() {
        let tmp = TempDir::new().unwrap();
        let workdir = Workdir::from_base(tmp.path());
        workdir.enter().unwrap();

        // Canonicalize both sides: on macOS the temp dir sits behind a
        // /private symlink.
        let current = std::env::current_dir().unwrap().canonicalize().unwrap();
        assert_eq!(current, tmp.path().canonicalize().unwrap());
    }

    #[test]
    fn enter_fails_for_a_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let workdir = Workdir::from_base(tmp.path().join("nonexistent"));
        let err = workdir.enter().unwrap_err();
        assert!(matches!(err, BootstrapError::EnterWorkdir { .. }));
    }
}
