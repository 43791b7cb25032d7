//! The bootstrap sequence.
//!
//! A linear run with one optional branch (environment activation) and one
//! terminal transfer-of-control step:
//!
//! 1. load the optional bootstrap configuration
//! 2. compute the virtual-environment overlay if a `venv/` marker exists
//! 3. provision the required directory layout
//! 4. launch the service and wait for it to terminate
//!
//! The caller resolves and enters the working directory first (see
//! [`crate::workdir::Workdir`]); everything here operates on that base.

use std::path::Path;
use std::process::ExitStatus;

use crate::config::BootstrapConfig;
use crate::error::BootstrapError;
use crate::launch::LaunchPlan;
use crate::layout::WorkspaceLayout;
use crate::venv;

/// Run the bootstrap sequence against a resolved base directory and return
/// the launched service's exit status.
///
/// Activation is computed before the launch, and the layout is provisioned
/// before the launch; a provisioning failure aborts without invoking the
/// service.
pub async fn run(base: &Path) -> Result<ExitStatus, BootstrapError> {
    let config = BootstrapConfig::load(base).await;
    let overlay = venv::detect(base).await;

    WorkspaceLayout::new(base)
        .with_extra_dirs(&config.extra_dirs)
        .ensure()
        .await?;

    LaunchPlan::resolve(base, &config, overlay).execute().await
}
