//! Run identity for correlating the log events of one pipeline run.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunIdentity {
    /// The unique ID for this pipeline run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_run_id: Option<Uuid>,

    /// The request ID, when the run was triggered by an HTTP request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
}

impl RunIdentity {
    /// Creates a new run identity with a generated pipeline run ID.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pipeline_run_id: Some(Uuid::new_v4()),
            ..Default::default()
        }
    }

    /// Sets the request ID.
    #[must_use]
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Returns the pipeline run ID as a string, or an empty string.
    #[must_use]
    pub fn pipeline_run_id_str(&self) -> String {
        self.pipeline_run_id
            .map(|id| id.to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_identity_new() {
        let identity = RunIdentity::new();
        assert!(identity.pipeline_run_id.is_some());
        assert!(identity.request_id.is_none());
    }

    #[test]
    fn test_run_identity_unique() {
        assert_ne!(RunIdentity::new(), RunIdentity::new());
    }

    #[test]
    fn test_run_identity_serialization_skips_missing() {
        let identity = RunIdentity::new();
        let value = serde_json::to_value(&identity).unwrap();
        assert!(value.get("pipeline_run_id").is_some());
        assert!(value.get("request_id").is_none());

        let with_request = identity.with_request_id(Uuid::new_v4());
        let round: RunIdentity =
            serde_json::from_str(&serde_json::to_string(&with_request).unwrap()).unwrap();
        assert_eq!(round, with_request);
    }
}
