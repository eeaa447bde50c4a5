//! Sequential pipeline execution.

use super::{PipelineResult, ResultAggregator, StageGraph, StageSpec};
use crate::context::{ContextProvider, PipelineContext, RunIdentity};
use crate::core::{Record, RecordExt};
use crate::errors::{PipelineError, StageError};
use crate::events::{
    log_agent_complete, log_agent_error, log_agent_start, log_pipeline_event, EventLogger,
    NoOpEventLogger,
};
use crate::stages::StageInput;
use futures::FutureExt;
use serde_json::{json, Value};
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, info_span, Instrument};

/// Runs a [`StageGraph`] one stage at a time.
///
/// Each run builds its context once, feeds every stage its declared input,
/// and aggregates outputs by result key. The first failure ends the run with
/// a single error and no stage output.
pub struct PipelineExecutor {
    graph: Arc<StageGraph>,
    context_provider: Arc<ContextProvider>,
    logger: Arc<dyn EventLogger>,
}

impl std::fmt::Debug for PipelineExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineExecutor")
            .field("pipeline", &self.graph.name())
            .field("stages", &self.graph.execution_order())
            .finish_non_exhaustive()
    }
}

impl PipelineExecutor {
    /// Creates an executor that discards events.
    #[must_use]
    pub fn new(graph: Arc<StageGraph>, context_provider: Arc<ContextProvider>) -> Self {
        Self {
            graph,
            context_provider,
            logger: Arc::new(NoOpEventLogger),
        }
    }

    /// Sets the event logger.
    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn EventLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Returns the graph.
    #[must_use]
    pub fn graph(&self) -> &StageGraph {
        &self.graph
    }

    /// Runs the pipeline under a fresh run identity.
    pub async fn run_pipeline(&self, initial_input: Record) -> PipelineResult {
        self.run_with_identity(initial_input, RunIdentity::new()).await
    }

    /// Runs the pipeline under the given run identity.
    pub async fn run_with_identity(
        &self,
        initial_input: Record,
        identity: RunIdentity,
    ) -> PipelineResult {
        let run_id = identity.pipeline_run_id_str();
        let span = info_span!("pipeline", run_id = %run_id, pipeline = %self.graph.name());

        async move {
            let logger = self.logger.as_ref();
            log_pipeline_event(
                logger,
                "Pipeline started",
                Some(&json!({ "run_id": run_id, "stages": self.graph.execution_order() })),
                false,
            );

            let started = Instant::now();
            let mut aggregator = ResultAggregator::new();
            match self.execute(&initial_input, &mut aggregator).await {
                Ok(()) => {
                    let executed = aggregator.len();
                    let result = aggregator.finish();
                    let simulation_status = result
                        .get("simulation")
                        .and_then(|s| s.get("status"))
                        .cloned()
                        .unwrap_or(Value::Null);
                    info!(
                        stages = executed,
                        duration_ms = started.elapsed().as_secs_f64() * 1000.0,
                        "Pipeline completed"
                    );
                    log_pipeline_event(
                        logger,
                        "Pipeline completed successfully",
                        Some(&json!({
                            "run_id": run_id,
                            "agents_executed": executed,
                            "simulation_included": result.get("simulation").is_some(),
                            "simulation_status": simulation_status,
                        })),
                        false,
                    );
                    result
                }
                Err(e) => {
                    let message = e.to_string();
                    error!(error = %message, "Pipeline failed");
                    log_pipeline_event(
                        logger,
                        "Pipeline execution failed",
                        Some(&json!({ "run_id": run_id, "error": message })),
                        true,
                    );
                    aggregator.fail(message)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn execute(
        &self,
        initial_input: &Record,
        aggregator: &mut ResultAggregator,
    ) -> Result<(), PipelineError> {
        let ctx = self.context_provider.build_context()?;
        self.log_context(&ctx)?;
        let mut outputs: HashMap<&str, Record> = HashMap::new();

        for spec in self.graph.ordered_stages() {
            let input = stage_input(spec, initial_input, &outputs);
            let stage_ctx = spec.receives_context.then_some(&ctx);
            let output = self
                .run_stage(spec, &input, stage_ctx)
                .instrument(info_span!("stage", stage = %spec.name))
                .await?;

            aggregator.record(spec.result_key.clone(), output.clone());
            outputs.insert(spec.name.as_str(), output);
        }

        Ok(())
    }

    fn log_context(&self, ctx: &PipelineContext) -> Result<(), PipelineError> {
        let vault = serde_json::to_value(ctx.vault_identity())?;
        self.logger.log_event(
            "VaultInit",
            "Loaded Vault metadata for SentiNexuls",
            Some(&vault),
            false,
        );

        if let Some(document) = ctx.identity_document() {
            let resolved = serde_json::to_value(&document.did_document)?;
            self.logger.log_event(
                "DID",
                "Resolved Vault DID document",
                Some(&resolved),
                false,
            );
        }
        Ok(())
    }

    async fn run_stage(
        &self,
        spec: &StageSpec,
        input: &StageInput,
        ctx: Option<&PipelineContext>,
    ) -> Result<Record, PipelineError> {
        let logger = self.logger.as_ref();
        let payload = Value::Object(input.payload.clone());
        log_agent_start(logger, &spec.name, &payload);

        let started = Instant::now();
        let outcome = AssertUnwindSafe(spec.runner.run(input, ctx))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(StageError::new(format!("panicked: {}", panic_message(&*panic))))
            });

        match outcome {
            Ok(output) => {
                log_agent_complete(
                    logger,
                    &spec.name,
                    &Value::Object(output.clone()),
                    Some(started.elapsed().as_secs_f64()),
                );
                Ok(output)
            }
            Err(e) => {
                error!(stage = %spec.name, error = %e, "Stage failed");
                log_agent_error(logger, &spec.name, &e.message, Some(&payload));
                Err(PipelineError::stage(&spec.name, e))
            }
        }
    }
}

fn stage_input(
    spec: &StageSpec,
    initial_input: &Record,
    outputs: &HashMap<&str, Record>,
) -> StageInput {
    let payload = match spec.dependency() {
        None => initial_input.clone(),
        Some(dep) => outputs.get(dep).cloned().unwrap_or_default(),
    };
    let side_input = spec
        .side_input
        .as_deref()
        .map(|field| initial_input.object_or_empty(field))
        .unwrap_or_default();
    StageInput::new(payload).with_side_input(side_input)
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
