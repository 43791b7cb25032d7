use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while preparing the runtime environment or handing
/// control to the service.
///
/// Every variant is fatal to the bootstrap: this layer has no business
/// logic to fall back to, so errors are surfaced to the operator via the
/// process exit status and a diagnostic naming the failed precondition.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("cannot locate the bootstrap executable: {0}")]
    LocateExecutable(#[source] std::io::Error),

    #[error("cannot canonicalize '{}': {}", .path.display(), .source)]
    Canonicalize {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("bootstrap executable '{}' has no parent directory", .path.display())]
    NoBaseDirectory { path: PathBuf },

    #[error("cannot enter working directory '{}': {}", .path.display(), .source)]
    EnterWorkdir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("'{}' exists but is not a directory", .path.display())]
    DirectoryConflict { path: PathBuf },

    #[error("cannot create required directory '{}': {}", .path.display(), .source)]
    DirectoryCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot launch service '{program}': {source}")]
    ServiceSpawn {
        program: String,
        source: std::io::Error,
    },

    #[error("cannot read service exit status: {source}")]
    ServiceWait { source: std::io::Error },
}
