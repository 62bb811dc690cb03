//! Sequential fail-fast stage runner

use crate::config::PipelineConfig;
use crate::error::{AutopressResult, StructuredError};
use crate::pipeline::report::{NullSink, PipelineReport, ReportSink, StageResult};
use crate::pipeline::stage::{PipelineState, Stage, StageHandler, StageState};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Ordered collection of named stage handlers, registered by the
/// integrations an application wires in.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: Vec<(String, Box<dyn StageHandler>)>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under a stage name. Registration order is used for
    /// stages the configuration does not mention.
    pub fn register(mut self, name: impl Into<String>, handler: Box<dyn StageHandler>) -> Self {
        self.handlers.push((name.into(), handler));
        self
    }

    /// Registered stage names, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.handlers.iter().map(|(name, _)| name.as_str()).collect()
    }
}

// Placeholder bound to config entries that name no registered handler. Such
// stages are forced to disabled and the handler is never invoked.
struct UnboundHandler;

#[async_trait]
impl StageHandler for UnboundHandler {
    async fn run(&self) -> AutopressResult<()> {
        Err(StructuredError::internal("stage has no bound handler"))
    }
}

/// Runs an ordered list of stages with fail-fast semantics.
///
/// One orchestrator run exclusively owns its stage results and final report;
/// nothing is shared across concurrent runs.
pub struct Pipeline {
    stages: Vec<Stage>,
    state: PipelineState,
    sink: Arc<dyn ReportSink>,
    config_snapshot: serde_json::Value,
    last_report: Option<PipelineReport>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            state: PipelineState::Idle,
            sink: Arc::new(NullSink),
            config_snapshot: serde_json::Value::Null,
            last_report: None,
        }
    }

    /// Bind a configuration to a handler registry.
    ///
    /// Stage order follows the configuration; config entries with no
    /// registered handler and registered handlers with no config entry both
    /// resolve to disabled stages.
    pub fn from_config(config: &PipelineConfig, registry: HandlerRegistry) -> Self {
        let mut remaining = registry.handlers;
        let mut pipeline = Self::new().with_config_snapshot(config.to_snapshot());
        for entry in &config.stages {
            match remaining.iter().position(|(name, _)| *name == entry.name) {
                Some(index) => {
                    let (name, handler) = remaining.remove(index);
                    pipeline = pipeline.add_stage(name, entry.enabled, handler);
                }
                None => {
                    debug!(stage = %entry.name, "no handler registered, stage disabled");
                    pipeline =
                        pipeline.add_stage(entry.name.clone(), false, Box::new(UnboundHandler));
                }
            }
        }
        for (name, handler) in remaining {
            debug!(stage = %name, "not in configuration, stage disabled");
            pipeline = pipeline.add_stage(name, false, handler);
        }
        pipeline
    }

    /// Append a stage. Stages run in insertion order.
    pub fn add_stage(
        mut self,
        name: impl Into<String>,
        enabled: bool,
        handler: Box<dyn StageHandler>,
    ) -> Self {
        self.stages.push(Stage::new(name, enabled, handler));
        self
    }

    /// Replace the report sink (defaults to [`NullSink`])
    pub fn with_sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Record the configuration the run was started with
    pub fn with_config_snapshot(mut self, snapshot: serde_json::Value) -> Self {
        self.config_snapshot = snapshot;
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// The report of the most recent run, kept so callers can render a
    /// summary even when `run` returned the stage failure.
    pub fn last_report(&self) -> Option<&PipelineReport> {
        self.last_report.as_ref()
    }

    /// Execute all stages in order.
    ///
    /// Disabled stages are recorded as skipped with zero duration. The first
    /// handler failure marks every remaining stage as skipped, finalizes the
    /// report, hands it to the sink and then propagates the failure. On a
    /// clean run the finalized report is returned.
    pub async fn run(&mut self) -> AutopressResult<PipelineReport> {
        self.transition(PipelineState::Running)?;
        let run_id = Uuid::new_v4();
        let timestamp = Utc::now();
        let started = Instant::now();
        info!(run_id = %run_id, stages = self.stages.len(), "pipeline started");

        let mut results = Vec::with_capacity(self.stages.len());
        let mut failure: Option<StructuredError> = None;

        for stage in &mut self.stages {
            if failure.is_some() {
                stage.transition(StageState::Skipped)?;
                results.push(StageResult::skipped(stage.name()));
                continue;
            }
            if !stage.enabled() {
                stage.transition(StageState::Skipped)?;
                debug!(stage = %stage.name(), "stage disabled, skipping");
                results.push(StageResult::skipped(stage.name()));
                continue;
            }

            stage.transition(StageState::Running)?;
            info!(stage = %stage.name(), "stage started");
            let stage_started = Instant::now();
            match stage.execute().await {
                Ok(()) => {
                    let duration_ms = stage_started.elapsed().as_millis() as u64;
                    stage.transition(StageState::Success)?;
                    info!(stage = %stage.name(), duration_ms, "stage completed");
                    results.push(StageResult::success(stage.name(), duration_ms));
                }
                Err(stage_error) => {
                    let duration_ms = stage_started.elapsed().as_millis() as u64;
                    stage.transition(StageState::Failed)?;
                    error!(
                        stage = %stage.name(),
                        duration_ms,
                        category = %stage_error.category,
                        severity = %stage_error.severity,
                        "stage failed, aborting remaining stages"
                    );
                    results.push(StageResult::failed(
                        stage.name(),
                        duration_ms,
                        stage_error.message.clone(),
                    ));
                    let stage_name = stage.name().to_string();
                    failure = Some(stage_error.with_metadata("stage", stage_name));
                }
            }
        }

        let outcome = if failure.is_some() {
            PipelineState::Aborted
        } else {
            PipelineState::Completed
        };
        self.transition(outcome)?;

        let report = PipelineReport {
            id: run_id,
            timestamp,
            total_duration_ms: started.elapsed().as_millis() as u64,
            outcome,
            stages: results,
            config_snapshot: self.config_snapshot.clone(),
        };
        info!("{}", report.summary());
        self.last_report = Some(report.clone());

        match failure {
            Some(stage_error) => {
                // The report must reach the sink before the failure escapes;
                // a sink failure at this point is logged, not propagated, so
                // it cannot mask the stage failure.
                if let Err(sink_error) = self.sink.persist(&report).await {
                    error!(
                        category = %sink_error.category,
                        "failed to persist aborted-run report: {sink_error}"
                    );
                }
                Err(stage_error)
            }
            None => {
                self.sink.persist(&report).await?;
                Ok(report)
            }
        }
    }

    fn transition(&mut self, target: PipelineState) -> AutopressResult<()> {
        if !self.state.can_transition_to(&target) {
            return Err(StructuredError::internal(format!(
                "illegal pipeline transition: {} -> {}",
                self.state, target
            )));
        }
        self.state = target;
        Ok(())
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stages)
            .field("state", &self.state)
            .finish()
    }
}
