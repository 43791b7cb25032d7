//! Service launch: entry-point resolution and the terminal handoff.
//!
//! The handoff is a spawn-and-wait rendition of process replacement: the
//! bootstrap starts the service as the foreground process with inherited
//! stdio, blocks for its lifetime, and propagates its exit status as its
//! own. There is no supervision after the handoff.

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use tokio::process::Command;

use crate::config::BootstrapConfig;
use crate::error::BootstrapError;
use crate::venv::EnvOverlay;

/// Default service entry point launched when no override is configured.
pub const SERVICE_ENTRY_POINT: &str = "webhook_receiver";

/// A fully resolved service invocation, built before the handoff.
#[derive(Debug)]
pub struct LaunchPlan {
    base: PathBuf,
    program: PathBuf,
    args: Vec<String>,
    overlay: Option<EnvOverlay>,
}

impl LaunchPlan {
    /// Resolve the service invocation for a prepared working directory.
    ///
    /// A configured `service.command` wins. Otherwise the default entry
    /// point is located in activation order: an executable in the virtual
    /// environment's binary directory shadows one in the working
    /// directory, which shadows an ambient `PATH` lookup of the bare name.
    pub fn resolve(base: &Path, config: &BootstrapConfig, overlay: Option<EnvOverlay>) -> Self {
        let (program, args) = match &config.service.command {
            Some(command) => (PathBuf::from(command), config.service.args.clone()),
            None => (
                Self::resolve_entry_point(base, overlay.as_ref()),
                Vec::new(),
            ),
        };
        Self {
            base: base.to_path_buf(),
            program,
            args,
            overlay,
        }
    }

    fn resolve_entry_point(base: &Path, overlay: Option<&EnvOverlay>) -> PathBuf {
        if let Some(overlay) = overlay {
            let candidate = overlay.bin_dir().join(SERVICE_ENTRY_POINT);
            if candidate.is_file() {
                return candidate;
            }
        }

        let local = base.join(SERVICE_ENTRY_POINT);
        if local.is_file() {
            return local;
        }

        PathBuf::from(SERVICE_ENTRY_POINT)
    }

    /// The program that will be launched.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Whether the plan carries an environment activation overlay.
    pub fn is_activated(&self) -> bool {
        self.overlay.is_some()
    }

    /// Spawn the service and wait for it to terminate.
    ///
    /// The child runs in the working directory with inherited stdio and
    /// the ambient environment, plus the activation overlay when one is
    /// present. The bootstrap's observable lifetime ends with the
    /// service's.
    ///
    /// # Errors
    ///
    /// [`BootstrapError::ServiceSpawn`] when the entry point is missing or
    /// not invocable; [`BootstrapError::ServiceWait`] when the exit status
    /// cannot be collected.
    pub async fn execute(&self) -> Result<ExitStatus, BootstrapError> {
        let mut command = Command::new(&self.program);
        command.args(&self.args).current_dir(&self.base);
        if let Some(overlay) = &self.overlay {
            overlay.apply(&mut command);
        }

        tracing::info!("handing off to service '{}'", self.program.display());

        let mut child = command
            .spawn()
            .map_err(|source| BootstrapError::ServiceSpawn {
                program: self.program.display().to_string(),
                source,
            })?;

        child
            .wait()
            .await
            .map_err(|source| BootstrapError::ServiceWait { source })
    }
}

/// Map a service exit status to the bootstrap's own exit code.
///
/// On Unix, termination by signal N maps to the conventional 128+N.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::venv;
    use tempfile::TempDir;

    fn write_script(path: &Path, body: &str) {
        std::fs::write(path, format!("#!/bin/sh\n{body}\n")).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    fn config_with_command(command: &str) -> BootstrapConfig {
        let mut config = BootstrapConfig::default();
        config.service.command = Some(command.to_string());
        config
    }

    #[tokio::test]
    async fn configured_command_runs_in_the_working_directory() {
        let tmp = TempDir::new().unwrap();
        let script = tmp.path().join("service.sh");
        // Writes relative to its cwd, which must be the base directory.
        write_script(&script, "echo invoked >> invocations.log");

        let config = config_with_command(script.to_str().unwrap());
        let plan = LaunchPlan::resolve(tmp.path(), &config, None);
        let status = plan.execute().await.unwrap();

        assert!(status.success());
        let log = std::fs::read_to_string(tmp.path().join("invocations.log")).unwrap();
        assert_eq!(log.lines().count(), 1);
    }

    #[tokio::test]
    async fn service_exit_code_is_propagated() {
        let tmp = TempDir::new().unwrap();
        let script = tmp.path().join("failing.sh");
        write_script(&script, "exit 7");

        let config = config_with_command(script.to_str().unwrap());
        let plan = LaunchPlan::resolve(tmp.path(), &config, None);
        let status = plan.execute().await.unwrap();

        assert_eq!(exit_code(status), 7);
    }

    #[tokio::test]
    async fn missing_entry_point_is_a_spawn_error() {
        let tmp = TempDir::new().unwrap();
        let config = config_with_command(tmp.path().join("absent").to_str().unwrap());
        let plan = LaunchPlan::resolve(tmp.path(), &config, None);

        let err = plan.execute().await.unwrap_err();
        assert!(matches!(err, BootstrapError::ServiceSpawn { .. }));
    }

    #[tokio::test]
    async fn overlay_is_visible_to_the_service() {
        let tmp = TempDir::new().unwrap();
        let bin = tmp.path().join("venv").join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        let script = tmp.path().join("dump.sh");
        write_script(&script, "printf '%s' \"$VIRTUAL_ENV\" > observed_env.txt");

        let overlay = venv::detect(tmp.path()).await.expect("overlay");
        let config = config_with_command(script.to_str().unwrap());
        let plan = LaunchPlan::resolve(tmp.path(), &config, Some(overlay));
        plan.execute().await.unwrap();

        let observed = std::fs::read_to_string(tmp.path().join("observed_env.txt")).unwrap();
        assert_eq!(observed, tmp.path().join("venv").to_str().unwrap());
    }

    #[tokio::test]
    async fn default_resolution_prefers_the_venv_entry_point() {
        let tmp = TempDir::new().unwrap();
        let bin = tmp.path().join("venv").join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        write_script(&bin.join(SERVICE_ENTRY_POINT), "exit 0");
        write_script(&tmp.path().join(SERVICE_ENTRY_POINT), "exit 0");

        let overlay = venv::detect(tmp.path()).await.expect("overlay");
        let plan = LaunchPlan::resolve(tmp.path(), &BootstrapConfig::default(), Some(overlay));

        assert_eq!(plan.program(), bin.join(SERVICE_ENTRY_POINT));
        assert!(plan.is_activated());
    }

    #[tokio::test]
    async fn default_resolution_falls_back_to_the_working_directory() {
        let tmp = TempDir::new().unwrap();
        write_script(&tmp.path().join(SERVICE_ENTRY_POINT), "exit 0");

        let plan = LaunchPlan::resolve(tmp.path(), &BootstrapConfig::default(), None);

        assert_eq!(plan.program(), tmp.path().join(SERVICE_ENTRY_POINT));
        assert!(!plan.is_activated());
    }

    #[tokio::test]
    async fn default_resolution_leaves_bare_name_for_path_lookup() {
        let tmp = TempDir::new().unwrap();
        let plan = LaunchPlan::resolve(tmp.path(), &BootstrapConfig::default(), None);
        assert_eq!(plan.program(), Path::new(SERVICE_ENTRY_POINT));
    }

    #[cfg(unix)]
    #[test]
    fn signal_termination_maps_to_128_plus_signal() {
        use std::os::unix::process::ExitStatusExt;
        // Raw wait status: low byte is the terminating signal.
        let status = ExitStatus::from_raw(9);
        assert_eq!(exit_code(status), 128 + 9);

        // Normal exit: code in the high byte.
        let status = ExitStatus::from_raw(7 << 8);
        assert_eq!(exit_code(status), 7);
    }
}
