//! Pipeline and stage specifications.

use crate::errors::PipelineValidationError;
use crate::stages::Stage;
use std::fmt;
use std::sync::Arc;

/// Builds a fresh stage instance for one execution.
type StageFactory = Arc<dyn Fn() -> anyhow::Result<Box<dyn Stage>> + Send + Sync>;

/// Specification for a single stage in a pipeline.
///
/// The spec holds a factory rather than a stage instance: each execution
/// builds its own instance when the stage is reached and drops it once the
/// stage returns.
#[derive(Clone)]
pub struct StageSpec {
    /// The stage name used in log lines.
    pub name: String,
    factory: StageFactory,
}

impl StageSpec {
    /// Creates a stage specification from an infallible constructor.
    #[must_use]
    pub fn new<S, F>(name: impl Into<String>, make: F) -> Self
    where
        S: Stage + 'static,
        F: Fn() -> S + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            factory: Arc::new(move || Ok(Box::new(make()) as Box<dyn Stage>)),
        }
    }

    /// Creates a stage specification from a constructor that may fail.
    ///
    /// A constructor error is reported as a failure of this stage.
    #[must_use]
    pub fn fallible<S, F>(name: impl Into<String>, make: F) -> Self
    where
        S: Stage + 'static,
        F: Fn() -> anyhow::Result<S> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            factory: Arc::new(move || Ok(Box::new(make()?) as Box<dyn Stage>)),
        }
    }

    /// Builds a fresh stage instance.
    pub fn instantiate(&self) -> anyhow::Result<Box<dyn Stage>> {
        (self.factory)()
    }

    /// Validates the stage specification.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or whitespace-only.
    pub fn validate(&self) -> Result<(), PipelineValidationError> {
        if self.name.trim().is_empty() {
            return Err(PipelineValidationError::new(
                "Stage name cannot be empty or whitespace-only",
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for StageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageSpec")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// An ordered, immutable list of stages.
///
/// Declaration order is execution order: every stage may assume all earlier
/// stages completed.
#[derive(Debug, Clone)]
pub struct PipelineDefinition {
    name: String,
    stages: Vec<StageSpec>,
}

impl PipelineDefinition {
    pub(crate) fn new(name: String, stages: Vec<StageSpec>) -> Self {
        Self { name, stages }
    }

    /// Returns the pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the stages in execution order.
    #[must_use]
    pub fn stages(&self) -> &[StageSpec] {
        &self.stages
    }

    /// Returns the stage names in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name.as_str()).collect()
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if the pipeline has no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
