//! Testing utilities for SentiNexuls pipelines.
//!
//! This module provides:
//! - Mock stages (static, failing, panicking, recording)
//! - A standard pipeline fixture with in-memory collaborators
//! - Assertions for pipeline results

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{assert_failed_with, assert_standard_result, STANDARD_RESULT_KEYS};
pub use fixtures::{fixed_resolver, TestPipeline};
pub use mocks::{FailingStage, PanickingStage, RecordedCall, RecordingStage, StaticStage};
