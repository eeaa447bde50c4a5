//! Stage specifications.

use crate::errors::{CycleDetectedError, PipelineValidationError};
use crate::stages::Stage;
use std::sync::Arc;

/// Where a stage's payload comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// The caller-supplied initial input.
    Initial,
    /// The output of the named stage.
    Stage(String),
}

/// Specification for a single stage in a pipeline.
#[derive(Debug, Clone)]
pub struct StageSpec {
    /// The unique name of the stage.
    pub name: String,
    /// The key the stage output is aggregated under.
    pub result_key: String,
    /// The stage implementation.
    pub runner: Arc<dyn Stage>,
    /// The payload source.
    pub input: InputSource,
    /// Field of the initial input delivered as side input.
    pub side_input: Option<String>,
    /// Whether the stage receives the run context.
    pub receives_context: bool,
}

impl StageSpec {
    /// Creates a new stage specification.
    ///
    /// Defaults: result key equal to the name, initial input as payload, no
    /// side input, context passed.
    #[must_use]
    pub fn new(name: impl Into<String>, runner: Arc<dyn Stage>) -> Self {
        let name = name.into();
        Self {
            result_key: name.clone(),
            name,
            runner,
            input: InputSource::Initial,
            side_input: None,
            receives_context: true,
        }
    }

    /// Sets the aggregation key.
    #[must_use]
    pub fn with_result_key(mut self, key: impl Into<String>) -> Self {
        self.result_key = key.into();
        self
    }

    /// Reads the payload from another stage's output.
    #[must_use]
    pub fn after(mut self, stage: impl Into<String>) -> Self {
        self.input = InputSource::Stage(stage.into());
        self
    }

    /// Delivers `field` of the initial input as side input.
    #[must_use]
    pub fn with_side_input(mut self, field: impl Into<String>) -> Self {
        self.side_input = Some(field.into());
        self
    }

    /// Runs the stage without the context.
    #[must_use]
    pub fn without_context(mut self) -> Self {
        self.receives_context = false;
        self
    }

    /// Returns the upstream stage, if any.
    #[must_use]
    pub fn dependency(&self) -> Option<&str> {
        match &self.input {
            InputSource::Initial => None,
            InputSource::Stage(name) => Some(name),
        }
    }

    /// Validates the stage specification.
    ///
    /// # Errors
    ///
    /// Returns an error if the stage depends on itself.
    pub fn validate(&self) -> Result<(), PipelineValidationError> {
        if self.dependency() == Some(self.name.as_str()) {
            return Err(CycleDetectedError::new(vec![self.name.clone(), self.name.clone()]).into());
        }
        Ok(())
    }
}
