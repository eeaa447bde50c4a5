//! Intelligence sweep agent.

use super::{Stage, StageInput};
use crate::context::{PipelineContext, CAP_SENTIENT_AGENTS};
use crate::core::{Record, RecordExt};
use crate::errors::StageError;
use async_trait::async_trait;
use serde_json::json;

const DEFAULT_SOURCES: &[&str] = &["dark_web", "osint", "cve_feeds"];
const DEFAULT_INDICATORS: &[&str] = &["CVE-2025-19304"];

/// Sweeps dark-web, OSINT and CVE feeds for threat indicators.
///
/// Reads `sources`, `region` and `indicators` from the payload. The output
/// carries the indicators forward for the vulnerability stage.
#[derive(Debug, Clone, Default)]
pub struct IntelSweepStage;

impl IntelSweepStage {
    /// Creates the stage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn threat_level(indicators: &[String]) -> &'static str {
    match indicators.len() {
        0 => "LOW",
        1..=2 => "HIGH",
        _ => "CRITICAL",
    }
}

#[async_trait]
impl Stage for IntelSweepStage {
    fn name(&self) -> &str {
        "intel"
    }

    async fn run(
        &self,
        input: &StageInput,
        ctx: Option<&PipelineContext>,
    ) -> Result<Record, StageError> {
        let payload = &input.payload;
        let sources = payload.strings_or("sources", DEFAULT_SOURCES);
        let indicators = payload.strings_or("indicators", DEFAULT_INDICATORS);

        let mut output = Record::new();
        output.insert("intel".into(), json!("Sample threat intel extracted."));
        output.insert("sources_scanned".into(), json!(sources));
        output.insert("region".into(), json!(payload.str_or("region", "unknown")));
        output.insert("threat_level".into(), json!(threat_level(&indicators)));
        output.insert("indicators".into(), json!(indicators));

        if ctx.is_some_and(|c| c.has_capability(CAP_SENTIENT_AGENTS)) {
            output.insert("sentient_analysis".into(), json!(true));
        }

        Ok(output)
    }
}
