//! Optional bootstrap configuration.
//!
//! Reads `bootstrap.toml` from the working directory. The bootstrap takes
//! no command-line arguments and reads no environment variables; this file
//! is the only override channel, and its absence is the unexceptional
//! common case. A malformed file logs a warning and falls back to the
//! defaults rather than failing the launch.

use std::path::Path;

use serde::Deserialize;

/// Configuration file name looked up in the working directory.
pub const CONFIG_FILE: &str = "bootstrap.toml";

/// Overrides for the bootstrap sequence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BootstrapConfig {
    /// Service invocation override.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Directories to provision in addition to the required set.
    #[serde(default)]
    pub extra_dirs: Vec<String>,
}

/// How to invoke the service entry point.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Program to launch instead of the default `webhook_receiver`
    /// resolution. Relative paths resolve against the working directory.
    pub command: Option<String>,

    /// Arguments passed to the override command. The default entry point
    /// is always launched with no arguments.
    #[serde(default)]
    pub args: Vec<String>,
}

impl BootstrapConfig {
    /// Load `{base}/bootstrap.toml`.
    ///
    /// - Missing file: returns the defaults.
    /// - Unreadable or unparsable file: logs a warning, returns the
    ///   defaults.
    pub async fn load(base: &Path) -> Self {
        let config_path = base.join(CONFIG_FILE);

        let content = match tokio::fs::read_to_string(&config_path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    "no {} at '{}', using defaults",
                    CONFIG_FILE,
                    config_path.display()
                );
                return Self::default();
            }
            Err(err) => {
                tracing::warn!(
                    "failed to read '{}': {err}, using defaults",
                    config_path.display()
                );
                return Self::default();
            }
        };

        match toml::from_str::<Self>(&content) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    "failed to parse '{}': {err}, using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }
}
