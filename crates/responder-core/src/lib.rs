//! Bootstrap orchestration for the forum responder webhook service.
//!
//! This crate prepares the runtime environment the `webhook_receiver`
//! service expects and then hands control to it: resolve the working
//! directory from the bootstrap binary's own location, optionally compute a
//! virtual-environment overlay for the child process, provision the
//! required on-disk layout (`logs/`, `db/`, `keys/`), and launch the
//! service as the foreground process.
//!
//! The internal format of the provisioned directories is owned entirely by
//! the service -- this crate only guarantees they exist.

pub mod config;
pub mod error;
pub mod launch;
pub mod layout;
pub mod orchestrator;
pub mod venv;
pub mod workdir;

pub use config::BootstrapConfig;
pub use error::BootstrapError;
pub use launch::{exit_code, LaunchPlan, SERVICE_ENTRY_POINT};
pub use layout::{WorkspaceLayout, REQUIRED_DIRS};
pub use venv::EnvOverlay;
pub use workdir::Workdir;
