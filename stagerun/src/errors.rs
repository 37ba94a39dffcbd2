//! Error types for the stagerun orchestrator.
//!
//! Stage implementations fail with arbitrary errors carried as
//! [`anyhow::Error`]. The orchestrator never transforms them: a
//! [`StageFailure`] only pairs the original cause with the identity of the
//! stage that raised it.

use std::any::Any;
use std::path::PathBuf;
use thiserror::Error;

/// A stage failure: the failing stage's identity plus its untouched cause.
#[derive(Debug, Error)]
#[error("Stage '{stage}' failed: {cause}")]
pub struct StageFailure {
    /// Name of the failing stage.
    pub stage: String,
    /// Zero-based position of the stage in the pipeline.
    pub index: usize,
    /// The error raised by the stage, exactly as raised.
    #[source]
    pub cause: anyhow::Error,
}

impl StageFailure {
    /// Creates a new stage failure.
    #[must_use]
    pub fn new(stage: impl Into<String>, index: usize, cause: anyhow::Error) -> Self {
        Self {
            stage: stage.into(),
            index,
            cause,
        }
    }

    /// Returns the name of the failing stage.
    #[must_use]
    pub fn stage(&self) -> &str {
        &self.stage
    }

    /// Returns the original cause.
    #[must_use]
    pub fn cause(&self) -> &anyhow::Error {
        &self.cause
    }

    /// Consumes the failure and returns the original cause.
    #[must_use]
    pub fn into_cause(self) -> anyhow::Error {
        self.cause
    }
}

/// Error raised when a pipeline definition is invalid.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct PipelineValidationError {
    /// The error message.
    pub message: String,
    /// The stages involved in the error.
    pub stages: Vec<String>,
}

impl PipelineValidationError {
    /// Creates a new pipeline validation error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stages: Vec::new(),
        }
    }

    /// Sets the stages involved.
    #[must_use]
    pub fn with_stages(mut self, stages: Vec<String>) -> Self {
        self.stages = stages;
        self
    }
}

/// A stage panicked instead of returning an error.
///
/// The runner catches the unwind and reports it like any other stage error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("stage panicked: {message}")]
pub struct StagePanic {
    /// The panic message, or a placeholder for non-string payloads.
    pub message: String,
}

impl StagePanic {
    /// Builds a panic error from a caught unwind payload.
    #[must_use]
    pub fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        Self { message }
    }
}

/// Errors raised while loading configuration or initialising logging.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file could not be read or created.
    #[error("IO error on {path}: {source}")]
    Io {
        /// The offending path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file could not be parsed.
    #[error("Failed to parse {path}: {source}")]
    Parse {
        /// The offending path.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The configuration parsed but is not usable.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Creates an invalid-configuration error.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("bad schema")]
    struct SchemaError;

    #[test]
    fn test_stage_failure_display() {
        let failure = StageFailure::new("Data Validation", 1, anyhow::Error::new(SchemaError));
        assert_eq!(failure.to_string(), "Stage 'Data Validation' failed: bad schema");
        assert_eq!(failure.stage(), "Data Validation");
        assert_eq!(failure.index, 1);
    }

    #[test]
    fn test_stage_failure_keeps_cause_type() {
        let failure = StageFailure::new("Data Validation", 1, anyhow::Error::new(SchemaError));
        assert!(failure.cause().downcast_ref::<SchemaError>().is_some());

        let source = std::error::Error::source(&failure).unwrap();
        assert_eq!(source.to_string(), "bad schema");

        let cause = failure.into_cause();
        assert!(cause.downcast::<SchemaError>().is_ok());
    }

    #[test]
    fn test_pipeline_validation_error_with_stages() {
        let err = PipelineValidationError::new("Duplicate stage name 'a'")
            .with_stages(vec!["a".to_string()]);
        assert_eq!(err.to_string(), "Duplicate stage name 'a'");
        assert_eq!(err.stages, vec!["a".to_string()]);
    }

    #[test]
    fn test_stage_panic_from_str_payload() {
        let payload: Box<dyn Any + Send> = Box::new("index out of bounds");
        let err = StagePanic::from_payload(payload.as_ref());
        assert_eq!(err.message, "index out of bounds");
        assert_eq!(err.to_string(), "stage panicked: index out of bounds");
    }

    #[test]
    fn test_stage_panic_from_string_payload() {
        let payload: Box<dyn Any + Send> = Box::new(format!("missing {}", "tokenizer"));
        assert_eq!(StagePanic::from_payload(payload.as_ref()).message, "missing tokenizer");
    }

    #[test]
    fn test_stage_panic_from_other_payload() {
        let payload: Box<dyn Any + Send> = Box::new(42_u32);
        assert_eq!(
            StagePanic::from_payload(payload.as_ref()).message,
            "non-string panic payload"
        );
    }
}
