//! Pipeline definition and execution.
//!
//! This module provides:
//! - Stage and pipeline specifications
//! - A validating pipeline builder
//! - The per-stage lifecycle runner
//! - The sequential, fail-fast orchestrator

mod builder;
mod orchestrator;
mod runner;
mod spec;

pub use builder::PipelineBuilder;
pub use orchestrator::{PipelineOrchestrator, RunSummary, StageRecord};
pub use runner::StageRunner;
pub use spec::{PipelineDefinition, StageSpec};
