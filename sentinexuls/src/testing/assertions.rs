//! Test assertions for pipeline results.

use crate::pipeline::PipelineResult;

/// The public result keys of the standard pipeline, in order.
pub const STANDARD_RESULT_KEYS: [&str; 5] =
    ["intel", "vulnerabilities", "impact", "simulation", "alert"];

/// Asserts that the run completed with exactly the standard result keys.
pub fn assert_standard_result(result: &PipelineResult) {
    assert!(result.is_success(), "Expected success, got error: {:?}", result.error());
    assert_eq!(result.keys(), STANDARD_RESULT_KEYS, "Unexpected result keys");
}

/// Asserts that the run failed with a message containing `needle` and
/// carries no stage output.
pub fn assert_failed_with(result: &PipelineResult, needle: &str) {
    let error = result
        .error()
        .unwrap_or_else(|| panic!("Expected failure, got keys: {:?}", result.keys()));
    assert!(
        error.contains(needle),
        "Expected error to contain '{needle}', got '{error}'"
    );
    assert_eq!(result.keys(), vec!["error"], "Failed result must only carry 'error'");
}
