//! Mock stages for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;

use crate::pipeline::StageSpec;
use crate::stages::Stage;

/// A plain message error, the stand-in for whatever a real stage raises.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValueError(pub String);

impl ValueError {
    /// Creates a new value error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Shared record of stage invocations, in call order.
///
/// Stage instances are rebuilt for every run, so the log lives outside them.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Creates an empty call log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a call.
    pub fn record(&self, label: &str) {
        self.calls.lock().push(label.to_string());
    }

    /// Returns every call in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Returns how many times `label` was called.
    #[must_use]
    pub fn count(&self, label: &str) -> usize {
        self.calls.lock().iter().filter(|c| *c == label).count()
    }

    /// Returns the total number of calls.
    #[must_use]
    pub fn total(&self) -> usize {
        self.calls.lock().len()
    }
}

/// A stage that records its call and succeeds.
#[derive(Debug)]
pub struct RecordingStage {
    label: String,
    log: CallLog,
}

impl RecordingStage {
    /// Creates a new recording stage.
    #[must_use]
    pub fn new(label: impl Into<String>, log: CallLog) -> Self {
        Self {
            label: label.into(),
            log,
        }
    }
}

#[async_trait]
impl Stage for RecordingStage {
    async fn run(&mut self) -> anyhow::Result<()> {
        self.log.record(&self.label);
        Ok(())
    }
}

/// A stage that records its call and fails with a [`ValueError`].
#[derive(Debug)]
pub struct FailingStage {
    label: String,
    log: CallLog,
    message: String,
}

impl FailingStage {
    /// Creates a new failing stage.
    #[must_use]
    pub fn new(label: impl Into<String>, log: CallLog, message: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            log,
            message: message.into(),
        }
    }
}

#[async_trait]
impl Stage for FailingStage {
    async fn run(&mut self) -> anyhow::Result<()> {
        self.log.record(&self.label);
        Err(ValueError::new(self.message.clone()).into())
    }
}

/// Builds a spec for a [`RecordingStage`] named `name`.
#[must_use]
pub fn recording_spec(name: &str, log: &CallLog) -> StageSpec {
    let label = name.to_string();
    let log = log.clone();
    StageSpec::new(name, move || RecordingStage::new(label.clone(), log.clone()))
}

/// Builds a spec for a [`FailingStage`] named `name`.
#[must_use]
pub fn failing_spec(name: &str, log: &CallLog, message: &str) -> StageSpec {
    let label = name.to_string();
    let log = log.clone();
    let message = message.to_string();
    StageSpec::new(name, move || {
        FailingStage::new(label.clone(), log.clone(), message.clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_stage() {
        let log = CallLog::new();
        let mut stage = RecordingStage::new("a", log.clone());

        stage.run().await.unwrap();

        assert_eq!(log.calls(), vec!["a".to_string()]);
        assert_eq!(log.count("a"), 1);
    }

    #[tokio::test]
    async fn test_failing_stage() {
        let log = CallLog::new();
        let mut stage = FailingStage::new("b", log.clone(), "bad schema");

        let err = stage.run().await.unwrap_err();

        assert_eq!(err.downcast_ref::<ValueError>(), Some(&ValueError::new("bad schema")));
        assert_eq!(log.total(), 1);
    }

    #[test]
    fn test_specs_share_log() {
        let log = CallLog::new();
        let spec = recording_spec("a", &log);
        assert_eq!(spec.name, "a");
        assert!(spec.instantiate().is_ok());
        assert_eq!(log.total(), 0);
    }
}
