//! Stage trait and the five pipeline agents.
//!
//! Stages are the units of work of a pipeline run. Each one turns an open
//! [`Record`] into another, optionally reading the shared
//! [`PipelineContext`].

mod alert;
mod impact;
mod intel;
mod simulation;
mod vuln;

pub use alert::AlertStage;
pub use impact::ImpactStage;
pub use intel::IntelSweepStage;
pub use simulation::SimulationStage;
pub use vuln::VulnDetectStage;

use crate::context::PipelineContext;
use crate::core::Record;
use crate::errors::StageError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// What a stage receives from the executor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageInput {
    /// The upstream stage's output, or the initial input for the first stage.
    pub payload: Record,
    /// A field of the initial input delivered outside the main chain.
    ///
    /// Empty unless the stage declares a side input.
    #[serde(default)]
    pub side_input: Record,
}

impl StageInput {
    /// Creates an input with an empty side input.
    #[must_use]
    pub fn new(payload: Record) -> Self {
        Self {
            payload,
            side_input: Record::new(),
        }
    }

    /// Sets the side input.
    #[must_use]
    pub fn with_side_input(mut self, side_input: Record) -> Self {
        self.side_input = side_input;
        self
    }
}

/// Trait for pipeline stages.
///
/// A stage must tolerate any input: every key it reads has a documented
/// default. It may add output keys based on context capabilities but only
/// ever sees the context by shared reference.
#[async_trait]
pub trait Stage: Send + Sync + Debug {
    /// Returns the name of the stage.
    fn name(&self) -> &str;

    /// Runs the stage.
    ///
    /// # Arguments
    ///
    /// * `input` - The payload and optional side input
    /// * `ctx` - The run context, `None` for stages declared without one
    ///
    /// # Returns
    ///
    /// The complete output record, or an error. Partial output is never
    /// returned on failure.
    async fn run(
        &self,
        input: &StageInput,
        ctx: Option<&PipelineContext>,
    ) -> Result<Record, StageError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record_from;
    use serde_json::json;

    #[test]
    fn test_stage_input_side_input() {
        let input =
            StageInput::new(Record::new()).with_side_input(record_from(json!({"region": "X"})));
        assert!(input.payload.is_empty());
        assert_eq!(input.side_input["region"], "X");
    }
}
