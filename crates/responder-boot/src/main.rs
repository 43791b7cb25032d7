//! Forum responder bootstrap entry point.
//!
//! Binary name: `responder-boot`
//!
//! Takes no command-line arguments. Resolves the working directory from
//! its own location, prepares the runtime environment the
//! `webhook_receiver` service expects, launches the service as the
//! foreground process, and exits with the service's own exit code.

use anyhow::Context;
use console::style;
use tracing_subscriber::EnvFilter;

use responder_core::{exit_code, orchestrator, Workdir};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let workdir = Workdir::resolve().context("cannot resolve the bootstrap working directory")?;
    workdir.enter()?;

    println!();
    println!(
        "  {} forum-responder bootstrap v{}",
        style("⚡").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("  {}", style(workdir.base().display()).dim());
    println!();

    let status = orchestrator::run(workdir.base()).await?;

    // Terminal handoff semantics: the bootstrap's observable lifetime ends
    // with the service's, and its exit code is the service's.
    std::process::exit(exit_code(status));
}
