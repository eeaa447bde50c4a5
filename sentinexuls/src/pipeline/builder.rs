//! Pipeline builder with validation.

use super::{StageGraph, StageSpec};
use crate::errors::{ContractErrorInfo, CycleDetectedError, PipelineValidationError};
use std::collections::{HashMap, HashSet};

/// Result key reserved for the failure shape of a [`PipelineResult`](super::PipelineResult).
pub const RESERVED_RESULT_KEY: &str = "error";

/// Builder for creating validated stage graphs.
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    /// The pipeline name.
    name: String,
    /// The stage specifications.
    stages: HashMap<String, StageSpec>,
    /// Insertion order for stages.
    stage_order: Vec<String>,
}

impl PipelineBuilder {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: HashMap::new(),
            stage_order: Vec::new(),
        }
    }

    /// Adds a stage whose upstream stage is already declared.
    ///
    /// # Errors
    ///
    /// Returns an error for a duplicate name or result key, the reserved
    /// `error` result key, an unknown upstream stage, or a self-dependency.
    pub fn stage(mut self, spec: StageSpec) -> Result<Self, PipelineValidationError> {
        spec.validate()?;
        self.check_unique(&spec)?;
        if let Some(dep) = spec.dependency() {
            if !self.stages.contains_key(dep) {
                return Err(missing_dependency(&spec.name, dep));
            }
        }
        self.insert(spec);
        Ok(self)
    }

    /// Adds a batch of stages that may reference each other in any order.
    ///
    /// # Errors
    ///
    /// Returns an error for duplicates, unknown upstream stages, or a cycle
    /// among the batch.
    pub fn stages(
        mut self,
        specs: impl IntoIterator<Item = StageSpec>,
    ) -> Result<Self, PipelineValidationError> {
        for spec in specs {
            spec.validate()?;
            self.check_unique(&spec)?;
            self.insert(spec);
        }

        for name in &self.stage_order {
            let spec = &self.stages[name];
            if let Some(dep) = spec.dependency() {
                if !self.stages.contains_key(dep) {
                    return Err(missing_dependency(name, dep));
                }
            }
        }

        self.detect_cycles()?;
        Ok(self)
    }

    /// Builds the graph.
    ///
    /// # Errors
    ///
    /// Returns an error if the builder has no stages.
    pub fn build(self) -> Result<StageGraph, PipelineValidationError> {
        if self.stages.is_empty() {
            return Err(PipelineValidationError::new("Pipeline has no stages")
                .with_error_info(
                    ContractErrorInfo::new("CONTRACT-004-EMPTY", "Cannot build an empty pipeline")
                        .with_fix_hint("Add at least one stage to the pipeline before building."),
                ));
        }

        Ok(StageGraph::new(self.name, self.stages, self.stage_order))
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

    fn insert(&mut self, spec: StageSpec) {
        self.stage_order.push(spec.name.clone());
        self.stages.insert(spec.name.clone(), spec);
    }

    fn check_unique(&self, spec: &StageSpec) -> Result<(), PipelineValidationError> {
        if spec.result_key == RESERVED_RESULT_KEY {
            return Err(PipelineValidationError::new(format!(
                "Stage '{}' uses the reserved result key '{RESERVED_RESULT_KEY}'",
                spec.name
            ))
            .with_stages(vec![spec.name.clone()])
            .with_error_info(
                ContractErrorInfo::new(
                    "CONTRACT-004-RESERVED_KEY",
                    format!("Result key '{RESERVED_RESULT_KEY}' marks a failed run"),
                )
                .with_fix_hint("Choose another result key with `with_result_key`."),
            ));
        }

        if self.stages.contains_key(&spec.name) {
            return Err(PipelineValidationError::new(format!(
                "Stage '{}' is declared twice",
                spec.name
            ))
            .with_stages(vec![spec.name.clone()])
            .with_error_info(
                ContractErrorInfo::new(
                    "CONTRACT-004-DUPLICATE",
                    format!("Duplicate stage '{}'", spec.name),
                )
                .with_fix_hint("Give every stage a unique name."),
            ));
        }

        if let Some(existing) = self.stages.values().find(|s| s.result_key == spec.result_key) {
            return Err(PipelineValidationError::new(format!(
                "Stages '{}' and '{}' share result key '{}'",
                existing.name, spec.name, spec.result_key
            ))
            .with_stages(vec![existing.name.clone(), spec.name.clone()])
            .with_error_info(
                ContractErrorInfo::new(
                    "CONTRACT-004-DUPLICATE_KEY",
                    format!("Result key '{}' is not unique", spec.result_key),
                )
                .with_context_entry("result_key", spec.result_key.clone()),
            ));
        }

        Ok(())
    }

    /// Detects cycles in the dependency graph.
    fn detect_cycles(&self) -> Result<(), CycleDetectedError> {
        let mut visited = HashSet::new();
        let mut rec_stack = HashSet::new();
        let mut path = Vec::new();

        for name in &self.stage_order {
            if !visited.contains(name) {
                if let Some(cycle) = self.dfs_cycle(name, &mut visited, &mut rec_stack, &mut path) {
                    return Err(CycleDetectedError::new(cycle));
                }
            }
        }

        Ok(())
    }

    fn dfs_cycle(
        &self,
        node: &str,
        visited: &mut HashSet<String>,
        rec_stack: &mut HashSet<String>,
        path: &mut Vec<String>,
    ) -> Option<Vec<String>> {
        visited.insert(node.to_string());
        rec_stack.insert(node.to_string());
        path.push(node.to_string());

        if let Some(dep) = self.stages.get(node).and_then(StageSpec::dependency) {
            if !visited.contains(dep) {
                if let Some(cycle) = self.dfs_cycle(dep, visited, rec_stack, path) {
                    return Some(cycle);
                }
            } else if rec_stack.contains(dep) {
                let cycle_start = path.iter().position(|n| n == dep).unwrap_or(0);
                let mut cycle: Vec<String> = path[cycle_start..].to_vec();
                cycle.push(dep.to_string());
                return Some(cycle);
            }
        }

        path.pop();
        rec_stack.remove(node);
        None
    }
}

fn missing_dependency(stage: &str, dep: &str) -> PipelineValidationError {
    PipelineValidationError::new(format!("Stage '{stage}' depends on unknown stage '{dep}'"))
        .with_stages(vec![stage.to_string(), dep.to_string()])
        .with_error_info(
            ContractErrorInfo::new(
                "CONTRACT-004-MISSING_DEP",
                format!("Dependency '{dep}' not found"),
            )
            .with_fix_hint("Ensure the dependency is added before the stage that depends on it."),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::Stage;
    use crate::testing::StaticStage;
    use std::sync::Arc;

    fn spec(name: &str) -> StageSpec {
        let runner: Arc<dyn Stage> = Arc::new(StaticStage::empty(name));
        StageSpec::new(name, runner)
    }

    #[test]
    fn test_builder_creation() {
        let builder = PipelineBuilder::new("test");
        assert_eq!(builder.name(), "test");
        assert_eq!(builder.stage_count(), 0);
    }

    #[test]
    fn test_builder_chain() {
        let builder = PipelineBuilder::new("test")
            .stage(spec("a"))
            .unwrap()
            .stage(spec("b").after("a"))
            .unwrap();
        assert_eq!(builder.stage_count(), 2);
    }

    #[test]
    fn test_builder_missing_dependency() {
        let err = PipelineBuilder::new("test").stage(spec("a").after("missing")).unwrap_err();
        assert_eq!(err.code(), Some("CONTRACT-004-MISSING_DEP"));
        assert_eq!(err.stages, vec!["a", "missing"]);
    }

    #[test]
    fn test_builder_duplicate_name() {
        let err = PipelineBuilder::new("test")
            .stage(spec("a"))
            .unwrap()
            .stage(spec("a").with_result_key("other"))
            .unwrap_err();
        assert_eq!(err.code(), Some("CONTRACT-004-DUPLICATE"));
    }

    #[test]
    fn test_builder_duplicate_result_key() {
        let err = PipelineBuilder::new("test")
            .stage(spec("a").with_result_key("out"))
            .unwrap()
            .stage(spec("b").with_result_key("out"))
            .unwrap_err();
        assert_eq!(err.code(), Some("CONTRACT-004-DUPLICATE_KEY"));
    }

    #[test]
    fn test_builder_rejects_error_result_key() {
        let err = PipelineBuilder::new("test")
            .stage(spec("intel"))
            .unwrap()
            .stage(spec("x").after("intel").with_result_key("error"))
            .unwrap_err();
        assert_eq!(err.code(), Some("CONTRACT-004-RESERVED_KEY"));
        assert_eq!(err.stages, vec!["x"]);
    }

    #[test]
    fn test_batch_rejects_stage_named_error() {
        let err = PipelineBuilder::new("test").stages([spec("error")]).unwrap_err();
        assert_eq!(err.code(), Some("CONTRACT-004-RESERVED_KEY"));
    }

    #[test]
    fn test_batch_allows_forward_references() {
        let graph = PipelineBuilder::new("test")
            .stages([spec("b").after("a"), spec("a")])
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(graph.execution_order(), ["a", "b"]);
    }

    #[test]
    fn test_batch_cycle_detection() {
        let err = PipelineBuilder::new("test")
            .stages([spec("a").after("c"), spec("b").after("a"), spec("c").after("b")])
            .unwrap_err();
        assert_eq!(err.code(), Some("CONTRACT-004-CYCLE"));
        assert_eq!(err.stages, vec!["a", "c", "b", "a"]);
    }

    #[test]
    fn test_batch_missing_dependency() {
        let err = PipelineBuilder::new("test")
            .stages([spec("a").after("ghost")])
            .unwrap_err();
        assert_eq!(err.code(), Some("CONTRACT-004-MISSING_DEP"));
    }

    #[test]
    fn test_builder_self_dependency() {
        let err = PipelineBuilder::new("test").stage(spec("a").after("a")).unwrap_err();
        assert_eq!(err.code(), Some("CONTRACT-004-CYCLE"));
    }

    #[test]
    fn test_builder_empty_build() {
        let err = PipelineBuilder::new("test").build().unwrap_err();
        assert_eq!(err.code(), Some("CONTRACT-004-EMPTY"));
    }
}
