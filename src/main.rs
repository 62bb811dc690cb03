//! Autopress CLI application
//!
//! Runs the content automation pipeline: keyword research, article
//! generation, deployment, and the measurement/distribution stages behind
//! them, with per-run JSON reports.
//!
//! ```bash
//! autopress config init      # create autopress.json
//! autopress run              # run the configured pipeline
//! autopress stages           # list stages and their enabled state
//! ```

mod app;
mod args;
mod console;

use anyhow::Context;
use args::Cli;
use autopress_core::{FailureSupervisor, SystemProcess, TracingLogger};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with environment-based filtering
    // Set RUST_LOG=debug for verbose logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Last-resort net for failures that escape every local handler. Only
    // critical-severity failures terminate the process.
    let supervisor = FailureSupervisor::new(Arc::new(TracingLogger), Arc::new(SystemProcess));
    supervisor
        .install()
        .context("failed to install failure supervisor")?;

    let cli = Cli::parse();
    app::run(cli).await
}
