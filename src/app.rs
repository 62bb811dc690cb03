//! Command implementations

use crate::args::{Cli, Commands, ConfigAction};
use crate::console::Console;
use anyhow::{Context, bail};
use autopress_core::{JsonFileSink, NullSink, Pipeline, PipelineConfig, ReportSink};
use colored::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let console = Console::new();
    match cli.command {
        Commands::Run {
            report_dir,
            no_report,
        } => run_pipeline(&cli.config, report_dir, no_report, &console).await,
        Commands::Stages => list_stages(&cli.config, &console),
        Commands::Config { action } => match action {
            ConfigAction::Init { force } => init_config(&cli.config, force, &console),
        },
    }
}

async fn run_pipeline(
    config_path: &Path,
    report_dir: Option<PathBuf>,
    no_report: bool,
    console: &Console,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let sink: Arc<dyn ReportSink> = if no_report {
        Arc::new(NullSink)
    } else {
        let directory = report_dir
            .or_else(|| config.report_dir.clone())
            .unwrap_or_else(|| PathBuf::from("reports"));
        Arc::new(JsonFileSink::new(directory))
    };

    let registry = autopress_integrations::default_registry();
    let mut pipeline = Pipeline::from_config(&config, registry).with_sink(sink);

    let outcome = pipeline.run().await;
    if let Some(report) = pipeline.last_report() {
        console.print_report(report);
    }
    match outcome {
        Ok(_) => {
            console.success("pipeline completed");
            Ok(())
        }
        Err(error) => {
            console.error(&format!("pipeline aborted: {error}"));
            std::process::exit(1);
        }
    }
}

fn list_stages(config_path: &Path, console: &Console) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let registry = autopress_integrations::default_registry();
    let registered = registry.names();
    console.print_header("Stages");
    for name in &registered {
        let enabled = config.stage(name).is_some_and(|stage| stage.enabled);
        if enabled {
            println!("{} {:<12} {}", "●".green(), name, "enabled".green());
        } else {
            println!("{} {:<12} {}", "○".dimmed(), name, "disabled".dimmed());
        }
    }
    for stage in &config.stages {
        if !registered.contains(&stage.name.as_str()) {
            println!(
                "{} {:<12} {}",
                "○".dimmed(),
                stage.name,
                "no handler registered".yellow()
            );
        }
    }
    Ok(())
}

fn init_config(path: &Path, force: bool, console: &Console) -> anyhow::Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite",
            path.display()
        );
    }
    let config = PipelineConfig::sample();
    let json = serde_json::to_string_pretty(&config)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    console.success(&format!("wrote {}", path.display()));
    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<PipelineConfig> {
    if !path.exists() {
        bail!(
            "configuration file {} not found; run `autopress config init` to create one",
            path.display()
        );
    }
    let config = PipelineConfig::from_file(path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    debug!(stages = config.stages.len(), "configuration loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_config_writes_loadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("autopress.json");
        init_config(&path, false, &Console::new()).unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config, PipelineConfig::sample());
    }

    #[test]
    fn test_init_config_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("autopress.json");
        init_config(&path, false, &Console::new()).unwrap();
        assert!(init_config(&path, false, &Console::new()).is_err());
        // --force replaces the file.
        init_config(&path, true, &Console::new()).unwrap();
    }

    #[test]
    fn test_load_config_missing_file_mentions_init() {
        let error = load_config(Path::new("/missing/autopress.json")).unwrap_err();
        assert!(error.to_string().contains("config init"));
    }
}
