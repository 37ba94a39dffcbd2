//! Small helpers for run identifiers and timestamps.

mod timestamps;

pub use timestamps::iso_timestamp;

use uuid::Uuid;

/// Generates a fresh identifier for one pipeline execution.
#[must_use]
pub fn generate_run_id() -> Uuid {
    Uuid::new_v4()
}
