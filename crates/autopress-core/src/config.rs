//! Pipeline configuration
//!
//! Loaded from a JSON file (`autopress.json` by default). The configuration
//! is an ordered list of stage entries; order here is execution order.

use crate::error::{AutopressResult, StructuredError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name used across all CLI commands.
pub const DEFAULT_CONFIG_FILE: &str = "autopress.json";

/// One configured stage. Entries not present in the file, and entries that
/// match no registered handler, behave as disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    /// Stage name, must match a registered handler to run
    pub name: String,
    /// Whether the stage runs at all
    #[serde(default)]
    pub enabled: bool,
}

impl StageConfig {
    pub fn new(name: impl Into<String>, enabled: bool) -> Self {
        Self {
            name: name.into(),
            enabled,
        }
    }
}

/// Full pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Stages in execution order
    #[serde(default)]
    pub stages: Vec<StageConfig>,
    /// Where run reports are written; the CLI falls back to `./reports`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_dir: Option<PathBuf>,
}

impl PipelineConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> AutopressResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            StructuredError::from(e).with_metadata("path", path.display().to_string())
        })?;
        serde_json::from_str(&content).map_err(|e| {
            StructuredError::validation(format!("invalid pipeline config: {e}"))
                .with_metadata("path", path.display().to_string())
        })
    }

    /// The default content pipeline: every demo stage, research through
    /// distribution, with the outbound channels disabled out of the box.
    pub fn sample() -> Self {
        Self {
            stages: vec![
                StageConfig::new("keywords", true),
                StageConfig::new("content", true),
                StageConfig::new("deploy", true),
                StageConfig::new("seo", true),
                StageConfig::new("social", false),
                StageConfig::new("email", false),
                StageConfig::new("analytics", true),
            ],
            report_dir: None,
        }
    }

    /// Look up a stage entry by name
    pub fn stage(&self, name: &str) -> Option<&StageConfig> {
        self.stages.iter().find(|stage| stage.name == name)
    }

    /// Serialize for embedding into a run report. Falls back to null if the
    /// config cannot be represented, which serde derives rule out anyway.
    pub fn to_snapshot(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
