//! Autopress Core Library
//!
//! This crate provides the pipeline orchestration and resilient-execution
//! core for Autopress: the structured error taxonomy, the classification
//! tables, the exponential-backoff retry engine, the process failure
//! supervisor and the sequential fail-fast stage orchestrator. The
//! integrations that actually talk to content, deployment and analytics
//! providers live in `autopress-integrations` and plug in through the
//! [`StageHandler`] contract.

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod retry;
pub mod supervisor;

// Re-export commonly used types
pub use config::{DEFAULT_CONFIG_FILE, PipelineConfig, StageConfig};
pub use error::{
    AutopressResult, ErrorCategory, Severity, StructuredError, classify, is_retryable_default,
    severity_for,
};
pub use logging::{Logger, TracingLogger};
pub use pipeline::{
    HandlerRegistry, JsonFileSink, NullSink, Pipeline, PipelineReport, PipelineState, ReportSink,
    Stage, StageHandler, StageResult, StageState, StageStatus, handler_fn,
};
pub use retry::{RetryOptions, backoff_delay, with_retry};
pub use supervisor::{FailureSupervisor, ProcessControl, SystemProcess};
