//! Error types for the SentiNexuls pipeline.
//!
//! Stage failures, identity lookup failures, graph validation failures and
//! publisher failures each have their own type; [`PipelineError`] is the
//! umbrella the executor works with.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// The main error type for pipeline operations.
///
/// Graph validation is not a variant: it surfaces from
/// [`PipelineBuilder`](crate::pipeline::PipelineBuilder) as a
/// [`PipelineValidationError`] before any run starts.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A stage failed while running.
    #[error("Stage '{stage}' failed: {source}")]
    Stage {
        /// The stage name.
        stage: String,
        /// The underlying stage error.
        #[source]
        source: StageError,
    },

    /// The context could not be built.
    #[error("Context build failed: {0}")]
    Context(#[from] IdentityError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A report template failed to render.
    #[error("Report rendering failed: {0}")]
    Render(#[from] Box<handlebars::RenderError>),
}

impl PipelineError {
    /// Wraps a stage error with the name of the stage that raised it.
    #[must_use]
    pub fn stage(stage: impl Into<String>, source: StageError) -> Self {
        Self::Stage {
            stage: stage.into(),
            source,
        }
    }
}

/// Error raised by a stage. A stage either returns a full record or this.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct StageError {
    /// The error message.
    pub message: String,
}

impl StageError {
    /// Creates a new stage error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for StageError {
    fn from(err: anyhow::Error) -> Self {
        Self::new(format!("{err:#}"))
    }
}

/// Errors from identity document lookup.
///
/// `NotFound` and `InvalidFormat` are sentinel values: the context provider
/// drops the enrichment and keeps going. `Backend` means the lookup itself
/// broke and aborts the run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// No document is registered for the identifier.
    #[error("DID not found: {0}")]
    NotFound(String),

    /// The identifier is empty or does not follow the `did:` convention.
    #[error("Invalid DID format: '{0}'")]
    InvalidFormat(String),

    /// The resolver backend failed.
    #[error("Identity resolver failure: {0}")]
    Backend(String),
}

impl IdentityError {
    /// Returns true if the error only means "no enrichment available".
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::InvalidFormat(_))
    }
}

/// Error raised when publishing a log entry to the chain stub.
#[derive(Debug, Clone, Error)]
#[error("Publish failed: {0}")]
pub struct PublishError(pub String);

/// Metadata about a contract error for better diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContractErrorInfo {
    /// Error code (e.g., "CONTRACT-004-CYCLE").
    pub code: String,
    /// Short summary of the error.
    pub summary: String,
    /// Hint for fixing the error.
    pub fix_hint: Option<String>,
    /// Additional context key-value pairs.
    #[serde(default)]
    pub context: HashMap<String, String>,
}

impl ContractErrorInfo {
    /// Creates a new contract error info.
    #[must_use]
    pub fn new(code: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            summary: summary.into(),
            fix_hint: None,
            context: HashMap::new(),
        }
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    /// Adds a single context entry.
    #[must_use]
    pub fn with_context_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

/// Error raised when pipeline validation fails.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct PipelineValidationError {
    /// The error message.
    pub message: String,
    /// The stages involved in the error.
    pub stages: Vec<String>,
    /// Optional contract error info.
    pub error_info: Option<ContractErrorInfo>,
}

impl PipelineValidationError {
    /// Creates a new pipeline validation error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stages: Vec::new(),
            error_info: None,
        }
    }

    /// Sets the stages involved.
    #[must_use]
    pub fn with_stages(mut self, stages: Vec<String>) -> Self {
        self.stages = stages;
        self
    }

    /// Sets the contract error info.
    #[must_use]
    pub fn with_error_info(mut self, info: ContractErrorInfo) -> Self {
        self.error_info = Some(info);
        self
    }

    /// Returns the contract code, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.error_info.as_ref().map(|info| info.code.as_str())
    }
}

/// Error raised when a cycle is detected in the pipeline graph.
#[derive(Debug, Clone, Error)]
#[error("Cycle detected in pipeline: {}", cycle_path.join(" -> "))]
pub struct CycleDetectedError {
    /// The path of stages forming the cycle.
    pub cycle_path: Vec<String>,
    /// Contract error info.
    pub error_info: ContractErrorInfo,
}

impl CycleDetectedError {
    /// Creates a new cycle detected error.
    #[must_use]
    pub fn new(cycle_path: Vec<String>) -> Self {
        let info = ContractErrorInfo::new(
            "CONTRACT-004-CYCLE",
            format!("Pipeline contains a dependency cycle: {}", cycle_path.join(" -> ")),
        )
        .with_fix_hint("Remove one of the dependencies in the cycle to break it.");

        Self {
            cycle_path,
            error_info: info,
        }
    }
}

impl From<CycleDetectedError> for PipelineValidationError {
    fn from(err: CycleDetectedError) -> Self {
        PipelineValidationError {
            message: err.to_string(),
            stages: err.cycle_path.clone(),
            error_info: Some(err.error_info),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_error_display() {
        let err = PipelineError::stage("impact", StageError::new("model offline"));
        assert_eq!(err.to_string(), "Stage 'impact' failed: model offline");
    }

    #[test]
    fn test_stage_error_from_anyhow() {
        let err: StageError = anyhow::anyhow!("inner").context("outer").into();
        assert_eq!(err.message, "outer: inner");
    }

    #[test]
    fn test_identity_error_sentinel() {
        assert!(IdentityError::NotFound("did:x:y".into()).is_sentinel());
        assert!(IdentityError::InvalidFormat(String::new()).is_sentinel());
        assert!(!IdentityError::Backend("registry down".into()).is_sentinel());
    }

    #[test]
    fn test_context_error_wraps_identity() {
        let err: PipelineError = IdentityError::Backend("timeout".into()).into();
        assert_eq!(
            err.to_string(),
            "Context build failed: Identity resolver failure: timeout"
        );
    }

    #[test]
    fn test_cycle_error_converts() {
        let err: PipelineValidationError =
            CycleDetectedError::new(vec!["a".into(), "b".into(), "a".into()]).into();
        assert_eq!(err.code(), Some("CONTRACT-004-CYCLE"));
        assert_eq!(err.stages, vec!["a", "b", "a"]);
        assert!(err.message.contains("a -> b -> a"));
    }

    #[test]
    fn test_validation_error_builder() {
        let err = PipelineValidationError::new("bad")
            .with_stages(vec!["x".into()])
            .with_error_info(
                ContractErrorInfo::new("CONTRACT-004-EMPTY", "empty")
                    .with_fix_hint("add a stage")
                    .with_context_entry("pipeline", "p"),
            );
        assert_eq!(err.code(), Some("CONTRACT-004-EMPTY"));
        let info = err.error_info.unwrap();
        assert_eq!(info.fix_hint.as_deref(), Some("add a stage"));
        assert_eq!(info.context.get("pipeline").map(String::as_str), Some("p"));
    }
}
