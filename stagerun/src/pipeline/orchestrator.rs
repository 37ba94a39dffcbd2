//! Sequential, fail-fast pipeline driver.

use super::{PipelineDefinition, StageRunner};
use crate::core::{ExecutionOutcome, RunState};
use crate::errors::StageFailure;
use crate::events::LifecycleSink;
use crate::observability::SpanTimer;
use crate::utils::generate_run_id;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Timing of one completed stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRecord {
    /// The stage name.
    pub name: String,
    /// Time spent in the stage.
    pub duration_ms: f64,
}

/// Report of a fully successful run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Identifier of this execution.
    pub run_id: Uuid,
    /// The pipeline name.
    pub pipeline: String,
    /// Completed stages in execution order.
    pub stages: Vec<StageRecord>,
    /// Total wall-clock time.
    pub duration_ms: f64,
}

/// Drives a [`PipelineDefinition`] from its first stage to its last.
///
/// Stages run one at a time in declaration order; the next stage is not
/// constructed until the previous one has returned successfully. The first
/// failure ends the run. Nothing is retried, rolled back, or logged a
/// second time here: the [`StageRunner`] already logged it.
#[derive(Debug)]
pub struct PipelineOrchestrator {
    runner: StageRunner,
    state: Mutex<RunState>,
}

impl PipelineOrchestrator {
    /// Creates an orchestrator reporting stage lifecycles to `sink`.
    #[must_use]
    pub fn new(sink: Arc<dyn LifecycleSink>) -> Self {
        Self {
            runner: StageRunner::new(sink),
            state: Mutex::new(RunState::NotStarted),
        }
    }

    /// Returns the state reached by the most recent run.
    #[must_use]
    pub fn last_state(&self) -> RunState {
        *self.state.lock()
    }

    /// Runs every stage of `definition` in order.
    ///
    /// An empty definition succeeds immediately without emitting anything.
    ///
    /// # Errors
    ///
    /// Returns the [`StageFailure`] of the first stage that failed. Its cause
    /// is the error the stage returned, untouched.
    pub async fn run(&self, definition: &PipelineDefinition) -> Result<RunSummary, StageFailure> {
        let run_id = generate_run_id();
        let span = tracing::info_span!(
            "pipeline.run",
            pipeline = %definition.name(),
            run_id = %run_id
        );

        self.run_inner(definition, run_id).instrument(span).await
    }

    async fn run_inner(
        &self,
        definition: &PipelineDefinition,
        run_id: Uuid,
    ) -> Result<RunSummary, StageFailure> {
        let timer = SpanTimer::start();
        let stage_count = definition.len();
        let mut records = Vec::with_capacity(stage_count);

        let mut state = self.set_state(RunState::begin(stage_count));

        for (index, spec) in definition.stages().iter().enumerate() {
            match self.runner.execute(spec, index).await {
                ExecutionOutcome::Completed { duration_ms } => {
                    records.push(StageRecord {
                        name: spec.name.clone(),
                        duration_ms,
                    });
                    state = self.set_state(state.advance(stage_count));
                }
                ExecutionOutcome::Failed(failure) => {
                    self.set_state(state.fail());
                    return Err(failure);
                }
            }
        }

        let duration_ms = timer.finish();
        tracing::debug!(stages = stage_count, duration_ms, "Pipeline completed");

        Ok(RunSummary {
            run_id,
            pipeline: definition.name().to_string(),
            stages: records,
            duration_ms,
        })
    }

    fn set_state(&self, next: RunState) -> RunState {
        *self.state.lock() = next;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{CollectingLifecycleSink, LifecycleKind};
    use crate::pipeline::PipelineBuilder;
    use crate::stages::NoOpStage;
    use pretty_assertions::assert_eq;
    use std::io;

    #[derive(Clone, Default)]
    struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

    impl CapturedOutput {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl io::Write for CapturedOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_run_all_noop() {
        let sink = Arc::new(CollectingLifecycleSink::new());
        let orchestrator = PipelineOrchestrator::new(sink.clone());
        let def = PipelineBuilder::new("p")
            .stage("a", || NoOpStage)
            .unwrap()
            .stage("b", || NoOpStage)
            .unwrap()
            .build()
            .unwrap();

        let summary = orchestrator.run(&def).await.unwrap();

        assert_eq!(summary.pipeline, "p");
        assert_eq!(
            summary.stages.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
        assert_eq!(sink.len(), 4);
        assert_eq!(orchestrator.last_state(), RunState::Completed);
    }

    #[tokio::test]
    async fn test_empty_pipeline_is_vacuous_success() {
        let sink = Arc::new(CollectingLifecycleSink::new());
        let orchestrator = PipelineOrchestrator::new(sink.clone());
        let def = PipelineBuilder::new("empty").build().unwrap();

        let summary = orchestrator.run(&def).await.unwrap();

        assert!(summary.stages.is_empty());
        assert!(sink.is_empty());
        assert_eq!(orchestrator.last_state(), RunState::Completed);
    }

    #[tokio::test]
    async fn test_failure_sets_failed_state() {
        let sink = Arc::new(CollectingLifecycleSink::new());
        let orchestrator = PipelineOrchestrator::new(sink.clone());
        let def = PipelineBuilder::new("p")
            .stage("a", || NoOpStage)
            .unwrap()
            .stage("b", || {
                crate::stages::FnStage::new(|| async { anyhow::bail!("boom") })
            })
            .unwrap()
            .stage("c", || NoOpStage)
            .unwrap()
            .build()
            .unwrap();

        let failure = orchestrator.run(&def).await.unwrap_err();

        assert_eq!(failure.stage(), "b");
        assert_eq!(orchestrator.last_state(), RunState::Failed { index: 1 });
        assert!(sink.entries_for_stage("c").is_empty());
        assert_eq!(sink.entries_of_kind(LifecycleKind::Failed).len(), 1);
    }

    #[tokio::test]
    async fn test_failure_is_not_logged_again_by_orchestrator() {
        let output = CapturedOutput::default();
        let writer = output.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let orchestrator = PipelineOrchestrator::new(Arc::new(crate::events::NoOpLifecycleSink));
        let def = PipelineBuilder::new("p")
            .stage("a", || NoOpStage)
            .unwrap()
            .stage("b", || {
                crate::stages::FnStage::new(|| async { anyhow::bail!("bad schema") })
            })
            .unwrap()
            .build()
            .unwrap();

        assert!(orchestrator.run(&def).await.is_err());
        assert_eq!(output.contents(), "");
    }

    #[tokio::test]
    async fn test_orchestrator_is_reusable_across_runs() {
        let sink = Arc::new(CollectingLifecycleSink::new());
        let orchestrator = PipelineOrchestrator::new(sink.clone());
        let def = PipelineBuilder::new("p")
            .stage("a", || NoOpStage)
            .unwrap()
            .build()
            .unwrap();

        let first = orchestrator.run(&def).await.unwrap();
        let second = orchestrator.run(&def).await.unwrap();

        assert_ne!(first.run_id, second.run_id);
        assert_eq!(sink.len(), 4);
    }

    #[test]
    fn test_run_summary_serializes() {
        let summary = RunSummary {
            run_id: Uuid::nil(),
            pipeline: "p".to_string(),
            stages: vec![StageRecord {
                name: "a".to_string(),
                duration_ms: 1.0,
            }],
            duration_ms: 1.0,
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["pipeline"], "p");
        assert_eq!(json["stages"][0]["name"], "a");
    }
}
