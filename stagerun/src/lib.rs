//! # Stagerun
//!
//! A strictly sequential, fail-fast stage pipeline runner.
//!
//! Stagerun drives an ordered list of named stages one at a time:
//!
//! - **Deterministic ordering**: stages run in declaration order, each only
//!   after the previous one returned successfully
//! - **Lifecycle logging**: every stage is bracketed by a started banner and
//!   either a completed banner or a single error entry
//! - **Fail-fast**: the first failure ends the run and is handed back to the
//!   caller with its original cause
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stagerun::prelude::*;
//! use std::sync::Arc;
//!
//! let pipeline = PipelineBuilder::new("training")
//!     .stage("Data Ingestion", || IngestionStage::new())?
//!     .stage("Model Training", || TrainingStage::new())?
//!     .build()?;
//!
//! let orchestrator = PipelineOrchestrator::new(Arc::new(TracingLifecycleSink));
//! let summary = orchestrator.run(&pipeline).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod core;
pub mod errors;
pub mod events;
pub mod observability;
pub mod pipeline;
pub mod stages;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{LogFormat, LoggingConfig, RunnerConfig, StageCommandConfig};
    pub use crate::core::{ExecutionOutcome, RunState};
    pub use crate::errors::{ConfigError, PipelineValidationError, StageFailure, StagePanic};
    pub use crate::events::{
        CollectingLifecycleSink, LifecycleEntry, LifecycleKind, LifecycleSink,
        NoOpLifecycleSink, TracingLifecycleSink,
    };
    pub use crate::observability::{init_logging, SpanTimer};
    pub use crate::pipeline::{
        PipelineBuilder, PipelineDefinition, PipelineOrchestrator, RunSummary, StageRecord,
        StageRunner, StageSpec,
    };
    pub use crate::stages::{CommandStage, FnStage, NoOpStage, Stage};
}
