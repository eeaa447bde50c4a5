//! Aggregated pipeline results.

use crate::core::Record;
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The all-or-nothing outcome of a pipeline run.
///
/// Serializes either as the ordered map of stage outputs, or as exactly
/// `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineResult {
    /// Every stage succeeded; outputs keyed by result key, in execution order.
    Completed(Record),
    /// Some step failed; no stage output survives.
    Failed {
        /// The failure message.
        error: String,
    },
}

impl PipelineResult {
    /// Returns true for a completed run.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Returns the error message of a failed run.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Completed(_) => None,
            Self::Failed { error } => Some(error),
        }
    }

    /// Returns the stage outputs of a completed run.
    #[must_use]
    pub fn outputs(&self) -> Option<&Record> {
        match self {
            Self::Completed(outputs) => Some(outputs),
            Self::Failed { .. } => None,
        }
    }

    /// Returns one stage output by result key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.outputs().and_then(|o| o.get(key))
    }

    /// Returns the top-level keys as they serialize.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Self::Completed(outputs) => outputs.keys().map(String::as_str).collect(),
            Self::Failed { .. } => vec!["error"],
        }
    }

    /// Converts into the JSON body.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Completed(outputs) => Value::Object(outputs),
            Self::Failed { error } => serde_json::json!({ "error": error }),
        }
    }
}

impl Serialize for PipelineResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Completed(outputs) => outputs.serialize(serializer),
            Self::Failed { error } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", error)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for PipelineResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = Record::deserialize(deserializer)?;
        if record.len() == 1 {
            if let Some(Value::String(error)) = record.get("error") {
                return Ok(Self::Failed { error: error.clone() });
            }
        }
        Ok(Self::Completed(record))
    }
}

/// Collects stage outputs for one run.
///
/// Outputs are kept in recording order. [`fail`](Self::fail) drops
/// everything recorded so far.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    outputs: Record,
}

impl ResultAggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one stage output under its result key.
    pub fn record(&mut self, key: impl Into<String>, output: Record) {
        self.outputs.insert(key.into(), Value::Object(output));
    }

    /// Returns the number of recorded outputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Completes the run with every recorded output.
    #[must_use]
    pub fn finish(self) -> PipelineResult {
        PipelineResult::Completed(self.outputs)
    }

    /// Fails the run, discarding recorded outputs.
    #[must_use]
    pub fn fail(self, message: impl Into<String>) -> PipelineResult {
        PipelineResult::Failed {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record_from;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_aggregator_preserves_order() {
        let mut agg = ResultAggregator::new();
        agg.record("intel", record_from(json!({"a": 1})));
        agg.record("vulnerabilities", record_from(json!({"b": 2})));
        agg.record("impact", Record::new());
        assert_eq!(agg.len(), 3);

        let result = agg.finish();
        assert!(result.is_success());
        assert_eq!(result.keys(), vec!["intel", "vulnerabilities", "impact"]);
        assert_eq!(result.get("intel"), Some(&json!({"a": 1})));
    }

    #[test]
    fn test_aggregator_fail_discards_outputs() {
        let mut agg = ResultAggregator::new();
        agg.record("intel", record_from(json!({"a": 1})));
        let result = agg.fail("Stage 'impact' failed: boom");

        assert_eq!(result.error(), Some("Stage 'impact' failed: boom"));
        assert!(result.outputs().is_none());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"error": "Stage 'impact' failed: boom"})
        );
    }

    #[test]
    fn test_completed_serializes_as_plain_map() {
        let mut agg = ResultAggregator::new();
        agg.record("alert", record_from(json!({"token_auth": true})));
        let text = serde_json::to_string(&agg.finish()).unwrap();
        assert_eq!(text, r#"{"alert":{"token_auth":true}}"#);
    }

    #[test]
    fn test_deserialize_shapes() {
        let failed: PipelineResult = serde_json::from_value(json!({"error": "x"})).unwrap();
        assert_eq!(failed, PipelineResult::Failed { error: "x".into() });

        let completed: PipelineResult =
            serde_json::from_value(json!({"intel": {}, "alert": {}})).unwrap();
        assert!(completed.is_success());
    }

    #[test]
    fn test_into_value() {
        let value = ResultAggregator::new().fail("nope").into_value();
        assert_eq!(value, json!({"error": "nope"}));
    }
}
