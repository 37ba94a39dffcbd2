//! Per-stage execution outcome.

use crate::errors::StageFailure;

/// The result of running one stage through the
/// [`StageRunner`](crate::pipeline::StageRunner).
#[derive(Debug)]
pub enum ExecutionOutcome {
    /// The stage returned normally.
    Completed {
        /// Wall-clock time spent in the stage.
        duration_ms: f64,
    },
    /// The stage raised an error.
    Failed(StageFailure),
}

impl ExecutionOutcome {
    /// Returns true if the stage completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Returns true if the stage failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns the failure, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&StageFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            Self::Completed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_outcome() {
        let outcome = ExecutionOutcome::Completed { duration_ms: 1.5 };
        assert!(outcome.is_completed());
        assert!(outcome.failure().is_none());
    }

    #[test]
    fn test_failed_outcome() {
        let failure = StageFailure::new("Model Training", 3, anyhow::anyhow!("out of memory"));
        let outcome = ExecutionOutcome::Failed(failure);
        assert!(outcome.is_failed());
        let failure = outcome.failure().unwrap();
        assert_eq!(failure.stage(), "Model Training");
        assert_eq!(failure.cause().to_string(), "out of memory");
    }
}
