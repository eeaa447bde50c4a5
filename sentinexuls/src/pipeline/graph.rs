//! Declarative stage graph.

use super::{PipelineBuilder, StageSpec};
use crate::errors::PipelineValidationError;
use crate::simulation::BreachSimulator;
use crate::stages::{
    AlertStage, ImpactStage, IntelSweepStage, SimulationStage, Stage, VulnDetectStage,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// A validated directed acyclic graph of stages.
///
/// Execution order is topological; stages with no ordering constraint
/// between them keep their declaration order.
#[derive(Debug)]
pub struct StageGraph {
    /// The pipeline name.
    name: String,
    /// Stage specifications.
    stages: HashMap<String, StageSpec>,
    /// Declaration order.
    declared: Vec<String>,
    /// Execution order (topologically sorted).
    execution_order: Vec<String>,
}

impl StageGraph {
    /// Creates a new stage graph from validated specs.
    pub(crate) fn new(
        name: String,
        stages: HashMap<String, StageSpec>,
        stage_order: Vec<String>,
    ) -> Self {
        let execution_order = topological_sort(&stages, &stage_order);

        Self {
            name,
            stages,
            declared: stage_order,
            execution_order,
        }
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

    /// Returns the execution order.
    #[must_use]
    pub fn execution_order(&self) -> &[String] {
        &self.execution_order
    }

    /// Returns a stage by name.
    #[must_use]
    pub fn stage(&self, name: &str) -> Option<&StageSpec> {
        self.stages.get(name)
    }

    /// Iterates the stages in execution order.
    pub fn ordered_stages(&self) -> impl Iterator<Item = &StageSpec> {
        self.execution_order.iter().filter_map(|name| self.stages.get(name))
    }

    /// Returns the `(upstream, downstream)` edges in declaration order.
    #[must_use]
    pub fn edges(&self) -> Vec<(String, String)> {
        self.declared
            .iter()
            .filter_map(|name| {
                let dep = self.stages.get(name)?.dependency()?;
                Some((dep.to_string(), name.clone()))
            })
            .collect()
    }

    /// Returns the result keys in execution order.
    #[must_use]
    pub fn result_keys(&self) -> Vec<&str> {
        self.ordered_stages().map(|s| s.result_key.as_str()).collect()
    }
}

/// Performs topological sort on the stage graph.
fn topological_sort(stages: &HashMap<String, StageSpec>, stage_order: &[String]) -> Vec<String> {
    let mut result = Vec::new();
    let mut visited = HashSet::new();
    let mut temp_visited = HashSet::new();

    fn visit(
        node: &str,
        stages: &HashMap<String, StageSpec>,
        visited: &mut HashSet<String>,
        temp_visited: &mut HashSet<String>,
        result: &mut Vec<String>,
    ) {
        if visited.contains(node) || temp_visited.contains(node) {
            return;
        }

        temp_visited.insert(node.to_string());
        if let Some(dep) = stages.get(node).and_then(StageSpec::dependency) {
            visit(dep, stages, visited, temp_visited, result);
        }
        temp_visited.remove(node);
        visited.insert(node.to_string());
        result.push(node.to_string());
    }

    // Visit in declaration order for determinism
    for name in stage_order {
        visit(name, stages, &mut visited, &mut temp_visited, &mut result);
    }

    result
}

/// The five agents of the standard pipeline.
#[derive(Debug, Clone)]
pub struct StandardStages {
    /// Intelligence sweep.
    pub intel: Arc<dyn Stage>,
    /// Vulnerability detection.
    pub vuln: Arc<dyn Stage>,
    /// Impact assessment.
    pub impact: Arc<dyn Stage>,
    /// Breach simulation.
    pub sim: Arc<dyn Stage>,
    /// Alert dispatch.
    pub alert: Arc<dyn Stage>,
}

impl Default for StandardStages {
    fn default() -> Self {
        Self::with_simulator(Arc::new(BreachSimulator::new()))
    }
}

impl StandardStages {
    /// Default agents with the given simulator behind the simulation stage.
    #[must_use]
    pub fn with_simulator(simulator: Arc<BreachSimulator>) -> Self {
        Self {
            intel: Arc::new(IntelSweepStage::new()),
            vuln: Arc::new(VulnDetectStage::new()),
            impact: Arc::new(ImpactStage::new()),
            sim: Arc::new(SimulationStage::new(simulator)),
            alert: Arc::new(AlertStage::new()),
        }
    }
}

/// Name of the standard pipeline.
pub const STANDARD_PIPELINE: &str = "sentinexuls";

/// Builds the standard graph with the default agents.
///
/// ```text
/// intel -> vuln -> impact -> alert
///             \-> sim  (+ initial_input.target_metadata, no context)
/// ```
pub fn standard_graph() -> Result<StageGraph, PipelineValidationError> {
    standard_graph_with(StandardStages::default())
}

/// Builds the standard graph around the given agents.
pub fn standard_graph_with(stages: StandardStages) -> Result<StageGraph, PipelineValidationError> {
    PipelineBuilder::new(STANDARD_PIPELINE)
        .stage(StageSpec::new("intel", stages.intel))?
        .stage(
            StageSpec::new("vuln", stages.vuln)
                .after("intel")
                .with_result_key("vulnerabilities"),
        )?
        .stage(StageSpec::new("impact", stages.impact).after("vuln"))?
        .stage(
            StageSpec::new("sim", stages.sim)
                .after("vuln")
                .with_result_key("simulation")
                .with_side_input("target_metadata")
                .without_context(),
        )?
        .stage(StageSpec::new("alert", stages.alert).after("impact"))?
        .build()
}
