//! CLI argument definitions using clap

use autopress_core::DEFAULT_CONFIG_FILE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "autopress")]
#[command(about = "Autopress - content automation pipeline")]
#[command(
    long_about = r#"Autopress - content automation pipeline

USAGE:
  autopress run                  # Run the configured pipeline
  autopress stages               # List stages and their enabled state
  autopress config init          # Create a default configuration file

Reports are written as JSON, one file per run. Set RUST_LOG=debug for
verbose logging."#
)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the configured pipeline
    Run {
        /// Directory for run reports (overrides the configured one)
        #[arg(long)]
        report_dir: Option<PathBuf>,

        /// Skip writing the run report
        #[arg(long)]
        no_report: bool,
    },
    /// List registered stages and their enabled state
    Stages,
    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_flags_parse() {
        let cli = Cli::parse_from(["autopress", "run", "--no-report"]);
        match cli.command {
            Commands::Run { no_report, .. } => assert!(no_report),
            _ => panic!("expected run command"),
        }
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["autopress", "stages", "--config", "custom.json"]);
        assert_eq!(cli.config, PathBuf::from("custom.json"));
    }
}
