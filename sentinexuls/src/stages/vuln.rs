//! Vulnerability detection agent.

use super::{Stage, StageInput};
use crate::context::{PipelineContext, CAP_SELF_EVOLVING};
use crate::core::{Record, RecordExt};
use crate::errors::StageError;
use async_trait::async_trait;
use serde_json::json;

const FALLBACK_VULNERABILITY: &str = "Example vulnerability #1";

/// Maps intel indicators to vulnerabilities.
///
/// The vulnerability list is never empty: without indicators the stage
/// reports a placeholder finding.
#[derive(Debug, Clone, Default)]
pub struct VulnDetectStage;

impl VulnDetectStage {
    /// Creates the stage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn severity_for(threat_level: &str) -> &'static str {
    match threat_level {
        "CRITICAL" => "CRITICAL",
        "HIGH" => "HIGH",
        "LOW" => "LOW",
        _ => "MEDIUM",
    }
}

#[async_trait]
impl Stage for VulnDetectStage {
    fn name(&self) -> &str {
        "vuln"
    }

    async fn run(
        &self,
        input: &StageInput,
        ctx: Option<&PipelineContext>,
    ) -> Result<Record, StageError> {
        let payload = &input.payload;
        let mut vulnerabilities = payload.strings_or("indicators", &[]);
        if vulnerabilities.is_empty() {
            vulnerabilities.push(FALLBACK_VULNERABILITY.to_string());
        }
        let threat_level = payload.str_or("threat_level", "unknown");

        let mut output = Record::new();
        output.insert("vulnerabilities".into(), json!(vulnerabilities));
        output.insert("severity".into(), json!(severity_for(threat_level)));
        output.insert("source_intel".into(), json!(payload.str_or("intel", "")));

        if ctx.is_some_and(|c| c.has_capability(CAP_SELF_EVOLVING)) {
            output.insert("adaptive_signatures".into(), json!(true));
        }

        Ok(output)
    }
}
