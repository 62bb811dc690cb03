//! CLI console utilities

use autopress_core::{PipelineReport, StageStatus};
use colored::*;

/// CLI console for formatted output
pub struct Console;

impl Console {
    pub const fn new() -> Self {
        Self
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message.green());
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    }

    /// Print a header
    pub fn print_header(&self, title: &str) {
        println!();
        println!("{}", title.bold().underline());
        println!("{}", "=".repeat(title.len()).dimmed());
    }

    /// Print the per-stage outcome of a finished run
    pub fn print_report(&self, report: &PipelineReport) {
        self.print_header("Pipeline run");
        for stage in &report.stages {
            match stage.status {
                StageStatus::Success => println!(
                    "{} {:<12} {:>6} ms",
                    "✓".green().bold(),
                    stage.stage_name,
                    stage.duration_ms
                ),
                StageStatus::Failed => println!(
                    "{} {:<12} {:>6} ms  {}",
                    "✗".red().bold(),
                    stage.stage_name,
                    stage.duration_ms,
                    stage.error.as_deref().unwrap_or("unknown error").red()
                ),
                StageStatus::Skipped => println!(
                    "{} {:<12} {}",
                    "-".dimmed(),
                    stage.stage_name,
                    "skipped".dimmed()
                ),
            }
        }
        println!();
        println!("{}", report.summary());
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}
