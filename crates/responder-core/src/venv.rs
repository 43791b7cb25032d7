//! Virtual-environment detection and the child-process environment overlay.
//!
//! A directory named `venv` under the working directory marks an isolated
//! runtime environment for the service. Activation is expressed as an
//! [`EnvOverlay`]: a set of environment overrides computed once at startup
//! and applied to the child `Command`, never to the bootstrap's own
//! ambient environment. The overlay is released implicitly when the
//! service process exits.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use tokio::process::Command;

/// Marker directory name checked under the working directory.
pub const VENV_DIR: &str = "venv";

#[cfg(unix)]
const BIN_DIR: &str = "bin";
#[cfg(not(unix))]
const BIN_DIR: &str = "Scripts";

/// Environment overrides for the launched service.
#[derive(Debug, Clone)]
pub struct EnvOverlay {
    bin_dir: PathBuf,
    sets: Vec<(&'static str, OsString)>,
    removes: Vec<&'static str>,
}

impl EnvOverlay {
    /// Apply the overrides to a child command. The command still inherits
    /// everything else from the ambient environment.
    pub fn apply(&self, command: &mut Command) {
        for (key, value) in &self.sets {
            command.env(key, value);
        }
        for key in &self.removes {
            command.env_remove(key);
        }
    }

    /// The environment's binary directory (`venv/bin`).
    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    /// Look up an override by variable name.
    pub fn get(&self, key: &str) -> Option<&OsStr> {
        self.sets
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_os_str())
    }
}

/// Check for a `venv/` marker under the base directory and compute the
/// activation overlay when one is usable.
///
/// Returns `None` -- and never fails the bootstrap -- when:
/// - the marker directory is absent (the unexceptional common case), or
/// - the marker exists but the environment is structurally unusable (no
///   binary directory). This is logged as a warning and the service runs
///   on the ambient runtime instead.
pub async fn detect(base: &Path) -> Option<EnvOverlay> {
    let venv = base.join(VENV_DIR);
    match tokio::fs::metadata(&venv).await {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            tracing::warn!(
                "'{}' exists but is not a directory; continuing with the ambient runtime",
                venv.display()
            );
            return None;
        }
        Err(_) => {
            tracing::debug!("no virtual environment at '{}'", venv.display());
            return None;
        }
    }

    let bin_dir = venv.join(BIN_DIR);
    if !bin_dir.is_dir() {
        tracing::warn!(
            "virtual environment '{}' has no '{}' directory; continuing with the ambient runtime",
            venv.display(),
            BIN_DIR
        );
        return None;
    }

    // Prepend the venv binaries to the child's PATH so its executables
    // shadow ambient ones, exactly as sourcing an activation script would.
    let mut entries = vec![bin_dir.clone()];
    if let Some(ambient) = std::env::var_os("PATH") {
        entries.extend(std::env::split_paths(&ambient));
    }
    let path = match std::env::join_paths(entries) {
        Ok(path) => path,
        Err(err) => {
            tracing::warn!(
                "cannot compose PATH for virtual environment '{}': {err}; \
                 continuing with the ambient runtime",
                venv.display()
            );
            return None;
        }
    };

    tracing::info!("activating virtual environment '{}'", venv.display());

    Some(EnvOverlay {
        bin_dir,
        sets: vec![
            ("VIRTUAL_ENV", venv.into_os_string()),
            ("PATH", path),
        ],
        removes: vec!["PYTHONHOME"],
    })
}
