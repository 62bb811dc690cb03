//! Run reports and report sinks

use crate::error::{AutopressResult, StructuredError};
use crate::pipeline::stage::{PipelineState, StageStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Outcome of one stage, recorded when the stage finishes (or is skipped)
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageResult {
    /// Stage name
    pub stage_name: String,
    /// Final status
    pub status: StageStatus,
    /// Wall-clock duration in milliseconds (zero for skipped stages)
    pub duration_ms: u64,
    /// Failure message, present only for failed stages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StageResult {
    pub fn skipped(stage_name: impl Into<String>) -> Self {
        Self {
            stage_name: stage_name.into(),
            status: StageStatus::Skipped,
            duration_ms: 0,
            error: None,
        }
    }

    pub fn success(stage_name: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            stage_name: stage_name.into(),
            status: StageStatus::Success,
            duration_ms,
            error: None,
        }
    }

    pub fn failed(
        stage_name: impl Into<String>,
        duration_ms: u64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            stage_name: stage_name.into(),
            status: StageStatus::Failed,
            duration_ms,
            error: Some(error.into()),
        }
    }
}

/// Timed per-stage record of one pipeline run.
///
/// Built exactly once when the run finishes, whether it completed or
/// aborted, and handed to a [`ReportSink`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Unique identifier for this run
    pub id: Uuid,
    /// When the run started
    pub timestamp: DateTime<Utc>,
    /// Total wall-clock duration in milliseconds
    pub total_duration_ms: u64,
    /// Final pipeline state, completed or aborted
    pub outcome: PipelineState,
    /// Per-stage results in execution order
    pub stages: Vec<StageResult>,
    /// The configuration the run was started with
    pub config_snapshot: serde_json::Value,
}

impl PipelineReport {
    /// The failed stage's result, if the run aborted
    pub fn failed_stage(&self) -> Option<&StageResult> {
        self.stages
            .iter()
            .find(|stage| stage.status == StageStatus::Failed)
    }

    /// One-line run summary
    pub fn summary(&self) -> String {
        let succeeded = self
            .stages
            .iter()
            .filter(|s| s.status == StageStatus::Success)
            .count();
        let skipped = self
            .stages
            .iter()
            .filter(|s| s.status == StageStatus::Skipped)
            .count();
        format!(
            "Pipeline {}: {} ({} succeeded, {} skipped, {:.2}s)",
            self.id,
            self.outcome,
            succeeded,
            skipped,
            self.total_duration_ms as f64 / 1000.0
        )
    }
}

/// Persistence collaborator for finished run reports.
///
/// The core does not dictate a storage format; sinks may serialize the
/// report wherever they like.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn persist(&self, report: &PipelineReport) -> AutopressResult<()>;
}

/// Writes each report as pretty-printed JSON under a directory.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    directory: PathBuf,
}

impl JsonFileSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn report_path(&self, report: &PipelineReport) -> PathBuf {
        self.directory.join(format!("report-{}.json", report.id))
    }
}

#[async_trait]
impl ReportSink for JsonFileSink {
    async fn persist(&self, report: &PipelineReport) -> AutopressResult<()> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(StructuredError::from)?;
        let json = serde_json::to_string_pretty(report)
            .map_err(|e| StructuredError::internal(format!("failed to serialize report: {e}")))?;
        let path = self.report_path(report);
        tokio::fs::write(&path, json)
            .await
            .map_err(StructuredError::from)?;
        tracing::debug!(path = %path.display(), "pipeline report written");
        Ok(())
    }
}

/// Discards every report. Used by tests and `--no-report` runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

#[async_trait]
impl ReportSink for NullSink {
    async fn persist(&self, _report: &PipelineReport) -> AutopressResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> PipelineReport {
        PipelineReport {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            total_duration_ms: 1530,
            outcome: PipelineState::Aborted,
            stages: vec![
                StageResult::success("keywords", 180),
                StageResult::failed("content", 1350, "429 too many requests"),
                StageResult::skipped("deploy"),
            ],
            config_snapshot: serde_json::json!({"stages": []}),
        }
    }

    #[test]
    fn test_failed_stage_lookup() {
        let report = sample_report();
        assert_eq!(report.failed_stage().unwrap().stage_name, "content");

        let mut completed = report.clone();
        completed.stages.retain(|s| s.status == StageStatus::Success);
        assert!(completed.failed_stage().is_none());
    }

    #[test]
    fn test_summary_counts() {
        let summary = sample_report().summary();
        assert!(summary.contains("aborted"));
        assert!(summary.contains("1 succeeded"));
        assert!(summary.contains("1 skipped"));
    }

    #[tokio::test]
    async fn test_json_file_sink_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonFileSink::new(dir.path());
        let report = sample_report();
        sink.persist(&report).await.unwrap();

        let path = dir.path().join(format!("report-{}.json", report.id));
        let content = std::fs::read_to_string(path).unwrap();
        let back: PipelineReport = serde_json::from_str(&content).unwrap();
        assert_eq!(back.id, report.id);
        assert_eq!(back.outcome, PipelineState::Aborted);
        assert_eq!(back.stages, report.stages);
    }

    #[tokio::test]
    async fn test_json_file_sink_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("reports").join("2026");
        let sink = JsonFileSink::new(&nested);
        sink.persist(&sample_report()).await.unwrap();
        assert!(nested.is_dir());
    }
}
