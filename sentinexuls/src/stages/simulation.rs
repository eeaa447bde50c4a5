//! Breach simulation agent.

use super::{Stage, StageInput};
use crate::context::PipelineContext;
use crate::core::Record;
use crate::errors::StageError;
use crate::simulation::BreachSimulator;
use async_trait::async_trait;
use std::sync::Arc;

/// Simulates a breach against the detected vulnerabilities.
///
/// The payload is the vulnerability stage output; the side input is the
/// `target_metadata` of the initial pipeline input. The stage runs without
/// context.
#[derive(Debug, Clone)]
pub struct SimulationStage {
    simulator: Arc<BreachSimulator>,
}

impl Default for SimulationStage {
    fn default() -> Self {
        Self::new(Arc::new(BreachSimulator::new()))
    }
}

impl SimulationStage {
    /// Creates the stage around a simulator.
    #[must_use]
    pub fn new(simulator: Arc<BreachSimulator>) -> Self {
        Self { simulator }
    }

    /// Creates the stage with a seeded simulator.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::new(Arc::new(BreachSimulator::with_seed(seed)))
    }
}

#[async_trait]
impl Stage for SimulationStage {
    fn name(&self) -> &str {
        "sim"
    }

    async fn run(
        &self,
        input: &StageInput,
        _ctx: Option<&PipelineContext>,
    ) -> Result<Record, StageError> {
        Ok(self.simulator.simulate_breach(&input.payload, &input.side_input))
    }
}
