//! Testing utilities for stagerun pipelines.
//!
//! This module provides:
//! - Stages that record their invocations into a shared call log
//! - Assertions over collected lifecycle entries

mod assertions;
mod mocks;

pub use assertions::{assert_aborted_at, assert_completed_in_order, expected_success_sequence};
pub use mocks::{failing_spec, recording_spec, CallLog, FailingStage, RecordingStage, ValueError};
