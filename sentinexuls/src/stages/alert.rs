//! Alert dispatch agent.

use super::{Stage, StageInput};
use crate::context::{PipelineContext, CAP_TOKEN_AUTH};
use crate::core::{Record, RecordExt};
use crate::errors::StageError;
use async_trait::async_trait;
use serde_json::json;

/// Dispatches the impact assessment to the alert channels.
///
/// Slack and the Vault UI are always notified; the compliance dashboard and
/// the DEV-EON network are added from the vault flags.
#[derive(Debug, Clone, Default)]
pub struct AlertStage;

impl AlertStage {
    /// Creates the stage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn priority(impact_score: f64) -> &'static str {
    if impact_score >= 90.0 {
        "CRITICAL"
    } else if impact_score >= 70.0 {
        "HIGH"
    } else if impact_score >= 40.0 {
        "MEDIUM"
    } else {
        "LOW"
    }
}

#[async_trait]
impl Stage for AlertStage {
    fn name(&self) -> &str {
        "alert"
    }

    async fn run(
        &self,
        input: &StageInput,
        ctx: Option<&PipelineContext>,
    ) -> Result<Record, StageError> {
        let payload = &input.payload;
        let impact_score = payload.f64_or("impact_score", 0.0);

        let mut channels = vec!["Slack", "Vault UI"];
        let mut token_auth = false;
        if let Some(ctx) = ctx {
            let vault = ctx.vault_identity();
            if vault.web4_compliance {
                channels.push("Web4 Dashboard");
            }
            if vault.dev_eon_linked {
                channels.push("DEV-EON Network");
            }
            token_auth = ctx.has_capability(CAP_TOKEN_AUTH);
        }

        let mut output = Record::new();
        output.insert(
            "alert_status".into(),
            json!(format!("Dispatched to {}", channels.join(" + "))),
        );
        output.insert("channels".into(), json!(channels));
        output.insert("token_auth".into(), json!(token_auth));
        output.insert("priority".into(), json!(priority(impact_score)));
        output.insert(
            "affected_zones".into(),
            json!(payload.strings_or("affected_zones", &[])),
        );
        output.insert("severity".into(), json!(payload.str_or("severity", "unknown")));

        Ok(output)
    }
}
