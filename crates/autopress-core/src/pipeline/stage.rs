//! Stage definitions and state machines

use crate::error::{AutopressResult, StructuredError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Lifecycle state of a single stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageState {
    /// Not yet reached by the runner
    Pending,
    /// Handler is in flight
    Running,
    /// Handler returned successfully
    Success,
    /// Handler raised an error
    Failed,
    /// Never ran: disabled, or aborted by an earlier failure
    Skipped,
}

impl std::fmt::Display for StageState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageState::Pending => write!(f, "pending"),
            StageState::Running => write!(f, "running"),
            StageState::Success => write!(f, "success"),
            StageState::Failed => write!(f, "failed"),
            StageState::Skipped => write!(f, "skipped"),
        }
    }
}

impl StageState {
    /// Check if the state represents a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StageState::Success | StageState::Failed | StageState::Skipped
        )
    }

    /// Check if transition to another state is valid
    pub fn can_transition_to(&self, target: &StageState) -> bool {
        match (self, target) {
            // A pending stage either starts running or is skipped outright
            // (disabled, or aborted by an earlier failure).
            (StageState::Pending, StageState::Running | StageState::Skipped) => true,
            // A running stage finishes one way or the other; it is never
            // skipped once started.
            (StageState::Running, StageState::Success | StageState::Failed) => true,
            // Terminal states have no valid transitions
            _ => false,
        }
    }
}

/// Lifecycle state of a whole pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    Running,
    /// Every enabled stage succeeded
    Completed,
    /// A stage failed and the rest were skipped
    Aborted,
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineState::Idle => write!(f, "idle"),
            PipelineState::Running => write!(f, "running"),
            PipelineState::Completed => write!(f, "completed"),
            PipelineState::Aborted => write!(f, "aborted"),
        }
    }
}

impl PipelineState {
    /// Check if the state represents a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Completed | PipelineState::Aborted)
    }

    /// Check if transition to another state is valid
    pub fn can_transition_to(&self, target: &PipelineState) -> bool {
        match (self, target) {
            (PipelineState::Idle, PipelineState::Running) => true,
            (PipelineState::Running, PipelineState::Completed | PipelineState::Aborted) => true,
            _ => false,
        }
    }
}

/// Report-facing outcome of a finished stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Success,
    Failed,
    Skipped,
}

impl std::fmt::Display for StageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageStatus::Success => write!(f, "success"),
            StageStatus::Failed => write!(f, "failed"),
            StageStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// One unit of work in the pipeline.
///
/// Handlers return nothing on success and a [`StructuredError`] (or anything
/// convertible into one) on failure. Handlers that talk to flaky external
/// services are expected to wrap their calls with
/// [`with_retry`](crate::retry::with_retry).
#[async_trait]
pub trait StageHandler: Send + Sync {
    async fn run(&self) -> AutopressResult<()>;
}

struct FnHandler<F>(F);

#[async_trait]
impl<F, Fut> StageHandler for FnHandler<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = AutopressResult<()>> + Send,
{
    async fn run(&self) -> AutopressResult<()> {
        (self.0)().await
    }
}

/// Wrap a closure as a stage handler.
pub fn handler_fn<F, Fut>(f: F) -> Box<dyn StageHandler>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = AutopressResult<()>> + Send + 'static,
{
    Box::new(FnHandler(f))
}

/// A named, independently failing unit of work plus its lifecycle state.
pub struct Stage {
    name: String,
    enabled: bool,
    handler: Box<dyn StageHandler>,
    state: StageState,
}

impl Stage {
    pub fn new(name: impl Into<String>, enabled: bool, handler: Box<dyn StageHandler>) -> Self {
        Self {
            name: name.into(),
            enabled,
            handler,
            state: StageState::Pending,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn state(&self) -> StageState {
        self.state
    }

    /// Move to `target`, enforcing the transition table. An illegal
    /// transition is a programming error in the runner, not a stage failure.
    pub(crate) fn transition(&mut self, target: StageState) -> AutopressResult<()> {
        if !self.state.can_transition_to(&target) {
            return Err(StructuredError::internal(format!(
                "illegal stage transition for {}: {} -> {}",
                self.name, self.state, target
            )));
        }
        self.state = target;
        Ok(())
    }

    pub(crate) async fn execute(&self) -> AutopressResult<()> {
        self.handler.run().await
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .field("state", &self.state)
            .finish()
    }
}
