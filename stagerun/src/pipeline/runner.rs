//! Lifecycle wrapper around a single stage invocation.

use super::StageSpec;
use crate::core::ExecutionOutcome;
use crate::errors::{StageFailure, StagePanic};
use crate::events::LifecycleSink;
use crate::observability::SpanTimer;
use futures::FutureExt;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Runs one stage between a started entry and either a completed entry or
/// a single failure entry.
#[derive(Clone)]
pub struct StageRunner {
    sink: Arc<dyn LifecycleSink>,
}

impl StageRunner {
    /// Creates a runner reporting to `sink`.
    #[must_use]
    pub fn new(sink: Arc<dyn LifecycleSink>) -> Self {
        Self { sink }
    }

    /// Executes the stage at position `index` of its pipeline.
    ///
    /// The stage is built from its factory, run once, and dropped before this
    /// returns. An error or panic during construction is treated the same as
    /// one during the run. On failure the cause is logged here, once, and handed
    /// back unchanged; a panic becomes a [`StagePanic`] cause.
    pub async fn execute(&self, spec: &StageSpec, index: usize) -> ExecutionOutcome {
        let name = spec.name.as_str();
        self.sink.stage_started(name);

        let timer = SpanTimer::start();
        let attempt = AssertUnwindSafe(async {
            match spec.instantiate() {
                Ok(mut stage) => stage.run().await,
                Err(err) => Err(err),
            }
        })
        .catch_unwind()
        .await;
        let result = attempt.unwrap_or_else(|payload| {
            Err(anyhow::Error::new(StagePanic::from_payload(payload.as_ref())))
        });

        match result {
            Ok(()) => {
                let duration_ms = timer.finish();
                self.sink.stage_completed(name, duration_ms);
                ExecutionOutcome::Completed { duration_ms }
            }
            Err(cause) => {
                self.sink.stage_failed(name, &cause);
                ExecutionOutcome::Failed(StageFailure::new(name, index, cause))
            }
        }
    }
}

impl fmt::Debug for StageRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageRunner").finish_non_exhaustive()
    }
}
