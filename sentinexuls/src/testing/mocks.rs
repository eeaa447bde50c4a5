//! Mock stages for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::context::PipelineContext;
use crate::core::Record;
use crate::errors::StageError;
use crate::stages::{Stage, StageInput};

/// A stage that always returns the same record.
#[derive(Debug, Clone)]
pub struct StaticStage {
    name: String,
    output: Record,
}

impl StaticStage {
    /// Creates a stage returning `output`.
    #[must_use]
    pub fn new(name: impl Into<String>, output: Record) -> Self {
        Self {
            name: name.into(),
            output,
        }
    }

    /// Creates a stage returning an empty record.
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Record::new())
    }
}

#[async_trait]
impl Stage for StaticStage {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(
        &self,
        _input: &StageInput,
        _ctx: Option<&PipelineContext>,
    ) -> Result<Record, StageError> {
        Ok(self.output.clone())
    }
}

/// A stage that always fails.
#[derive(Debug, Clone)]
pub struct FailingStage {
    name: String,
    error: String,
}

impl FailingStage {
    /// Creates a new failing stage.
    #[must_use]
    pub fn new(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            error: error.into(),
        }
    }
}

#[async_trait]
impl Stage for FailingStage {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(
        &self,
        _input: &StageInput,
        _ctx: Option<&PipelineContext>,
    ) -> Result<Record, StageError> {
        Err(StageError::new(self.error.clone()))
    }
}

/// A stage that panics.
#[derive(Debug, Clone)]
pub struct PanickingStage {
    name: String,
    message: String,
}

impl PanickingStage {
    /// Creates a stage that panics with `message`.
    #[must_use]
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl Stage for PanickingStage {
    fn name(&self) -> &str {
        &self.name
    }

    #[allow(clippy::panic)]
    async fn run(
        &self,
        _input: &StageInput,
        _ctx: Option<&PipelineContext>,
    ) -> Result<Record, StageError> {
        panic!("{}", self.message)
    }
}

/// One recorded call of a [`RecordingStage`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// The stage that was called.
    pub stage: String,
    /// The input it received.
    pub input: StageInput,
    /// Whether a context was passed.
    pub had_context: bool,
}

/// A stage that records its calls into a shared journal and wraps another
/// stage (or echoes its payload).
#[derive(Debug, Clone)]
pub struct RecordingStage {
    name: String,
    inner: Option<Arc<dyn Stage>>,
    journal: Arc<Mutex<Vec<RecordedCall>>>,
}

impl RecordingStage {
    /// Creates a stage that echoes its payload.
    #[must_use]
    pub fn new(name: impl Into<String>, journal: Arc<Mutex<Vec<RecordedCall>>>) -> Self {
        Self {
            name: name.into(),
            inner: None,
            journal,
        }
    }

    /// Creates a recording wrapper around `inner`.
    #[must_use]
    pub fn wrapping(inner: Arc<dyn Stage>, journal: Arc<Mutex<Vec<RecordedCall>>>) -> Self {
        Self {
            name: inner.name().to_string(),
            inner: Some(inner),
            journal,
        }
    }
}

#[async_trait]
impl Stage for RecordingStage {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(
        &self,
        input: &StageInput,
        ctx: Option<&PipelineContext>,
    ) -> Result<Record, StageError> {
        self.journal.lock().push(RecordedCall {
            stage: self.name.clone(),
            input: input.clone(),
            had_context: ctx.is_some(),
        });
        match &self.inner {
            Some(inner) => inner.run(input, ctx).await,
            None => Ok(input.payload.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record_from;
    use serde_json::json;

    #[tokio::test]
    async fn test_static_stage() {
        let stage = StaticStage::new("s", record_from(json!({"k": "v"})));
        let output = stage.run(&StageInput::default(), None).await.unwrap();
        assert_eq!(output["k"], "v");
    }

    #[tokio::test]
    async fn test_failing_stage() {
        let stage = FailingStage::new("f", "boom");
        assert_eq!(stage.run(&StageInput::default(), None).await.unwrap_err().message, "boom");
    }

    #[tokio::test]
    async fn test_recording_stage() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let stage =
            RecordingStage::wrapping(Arc::new(StaticStage::empty("inner")), journal.clone());
        assert_eq!(stage.name(), "inner");

        stage.run(&StageInput::default(), None).await.unwrap();
        let calls = journal.lock().clone();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].stage, "inner");
        assert!(!calls[0].had_context);
    }
}
