//! Pipeline building and execution.
//!
//! This module provides:
//! - Stage specifications and the validating builder
//! - The declarative stage graph, including the standard five-agent graph
//! - The sequential executor and the result aggregator

mod builder;
mod executor;
mod graph;
#[cfg(test)]
mod integration_tests;
mod result;
mod spec;

pub use builder::{PipelineBuilder, RESERVED_RESULT_KEY};
pub use executor::PipelineExecutor;
pub use graph::{standard_graph, standard_graph_with, StageGraph, StandardStages, STANDARD_PIPELINE};
pub use result::{PipelineResult, ResultAggregator};
pub use spec::{InputSource, StageSpec};
