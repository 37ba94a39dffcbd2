//! Pipeline builder with validation.

use super::{PipelineDefinition, StageSpec};
use crate::errors::PipelineValidationError;
use crate::stages::Stage;
use std::collections::HashSet;

/// Builder for creating validated pipeline definitions.
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    /// The pipeline name.
    name: String,
    /// The stage specifications, in insertion order.
    stages: Vec<StageSpec>,
    /// Names already taken.
    names: HashSet<String>,
}

impl PipelineBuilder {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
            names: HashSet::new(),
        }
    }

    /// Appends a stage built by an infallible constructor.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or already used.
    pub fn stage<S, F>(mut self, name: impl Into<String>, make: F) -> Result<Self, PipelineValidationError>
    where
        S: Stage + 'static,
        F: Fn() -> S + Send + Sync + 'static,
    {
        self.add_stage_spec(StageSpec::new(name, make))?;
        Ok(self)
    }

    /// Appends a stage specification.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or already used.
    pub fn add_stage_spec(&mut self, spec: StageSpec) -> Result<(), PipelineValidationError> {
        spec.validate()?;

        if self.names.contains(&spec.name) {
            return Err(PipelineValidationError::new(format!(
                "Duplicate stage name '{}'",
                spec.name
            ))
            .with_stages(vec![spec.name.clone()]));
        }

        self.names.insert(spec.name.clone());
        self.stages.push(spec);
        Ok(())
    }

    /// Appends every stage of `other` after the stages of this builder.
    ///
    /// # Errors
    ///
    /// Returns an error if both builders declare a stage with the same name.
    pub fn compose(mut self, other: Self) -> Result<Self, PipelineValidationError> {
        self.name = format!("{}+{}", self.name, other.name);
        for spec in other.stages {
            self.add_stage_spec(spec)?;
        }
        Ok(self)
    }

    /// Builds the pipeline definition.
    ///
    /// A builder without stages produces an empty definition, which runs as
    /// an immediate success.
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline name is empty or whitespace-only.
    pub fn build(self) -> Result<PipelineDefinition, PipelineValidationError> {
        if self.name.trim().is_empty() {
            return Err(PipelineValidationError::new(
                "Pipeline name cannot be empty or whitespace-only",
            ));
        }

        Ok(PipelineDefinition::new(self.name, self.stages))
    }

    /// Returns the pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}
