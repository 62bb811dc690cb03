//! Stage orchestration
//!
//! A pipeline is an ordered list of named stages, each wrapping a call into
//! an external collaborator. Stages run strictly sequentially; the first
//! failure aborts every remaining stage (fail-fast), and every run, aborted
//! or not, produces a timed per-stage report that is handed to a report sink.

mod orchestrator;
mod report;
mod stage;

pub use orchestrator::{HandlerRegistry, Pipeline};
pub use report::{JsonFileSink, NullSink, PipelineReport, ReportSink, StageResult};
pub use stage::{
    PipelineState, Stage, StageHandler, StageState, StageStatus, handler_fn,
};
