//! Core domain model types for stagerun.
//!
//! This module contains:
//! - The run state machine
//! - The per-stage execution outcome

mod outcome;
mod status;

pub use outcome::ExecutionOutcome;
pub use status::RunState;
