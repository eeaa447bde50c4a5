//! Impact assessment agent.

use super::{Stage, StageInput};
use crate::context::{PipelineContext, CAP_DID_AUDITS};
use crate::core::{Record, RecordExt};
use crate::did::create_audit_entry;
use crate::errors::StageError;
use crate::utils::now_utc;
use async_trait::async_trait;
use serde_json::json;

const BASE_IMPACT_SCORE: f64 = 92.5;
const DEFAULT_ZONES: &[&str] = &["Grid A", "Grid B"];

/// Scores the impact of the detected vulnerabilities.
///
/// With DID-authenticated audits enabled and a resolved identity document,
/// the assessment is stamped with an audit entry and the audit endpoint.
#[derive(Debug, Clone, Default)]
pub struct ImpactStage;

impl ImpactStage {
    /// Creates the stage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Stage for ImpactStage {
    fn name(&self) -> &str {
        "impact"
    }

    async fn run(
        &self,
        input: &StageInput,
        ctx: Option<&PipelineContext>,
    ) -> Result<Record, StageError> {
        let payload = &input.payload;
        let vulnerability_count = payload.array_or("vulnerabilities", Vec::new()).len();
        let zones = payload.strings_or("affected_zones", DEFAULT_ZONES);

        let mut output = Record::new();
        output.insert("impact_score".into(), json!(BASE_IMPACT_SCORE));
        output.insert("affected_zones".into(), json!(zones));
        output.insert("vulnerability_count".into(), json!(vulnerability_count));
        output.insert("severity".into(), json!(payload.str_or("severity", "unknown")));

        let audited = ctx
            .filter(|c| c.has_capability(CAP_DID_AUDITS))
            .and_then(|c| c.identity_document());
        if let Some(did) = audited {
            if let Some(endpoint) = &did.audit_endpoint {
                output.insert("audit_endpoint".into(), json!(endpoint));
            }
            let entry = create_audit_entry(
                &did.vault_did,
                "impact_assessment",
                json!({
                    "impact_score": BASE_IMPACT_SCORE,
                    "vulnerability_count": vulnerability_count,
                }),
                &now_utc(),
            );
            output.insert(
                "audit_entry".into(),
                serde_json::to_value(entry).map_err(|e| StageError::new(e.to_string()))?,
            );
        }

        Ok(output)
    }
}
