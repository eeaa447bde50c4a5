//! End-to-end tests of the standard pipeline.

#[cfg(test)]
mod tests {
    use crate::context::{
        ConfigProvider, ContextProvider, InMemoryConfigStore, VaultIdentity, VaultPatch,
        CAP_TOKEN_AUTH,
    };
    use crate::core::{record_from, Record};
    use crate::did::MockIdentityResolver;
    use crate::errors::IdentityError;
    use crate::events::CollectingEventLogger;
    use crate::pipeline::{standard_graph, PipelineExecutor, PipelineResult, StandardStages};
    use crate::simulation::BreachSimulator;
    use crate::stages::Stage;
    use crate::testing::{
        assert_failed_with, assert_standard_result, FailingStage, PanickingStage, TestPipeline,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn seeded_stages() -> StandardStages {
        StandardStages::with_simulator(Arc::new(BreachSimulator::with_seed(42)))
    }

    #[tokio::test]
    async fn test_empty_input_succeeds() {
        let pipeline = TestPipeline::standard();
        let result = pipeline.executor.run_pipeline(Record::new()).await;

        assert_standard_result(&result);
        let alert = result.get("alert").unwrap();
        let channels = alert["channels"].as_array().unwrap();
        assert!(channels.contains(&json!("Slack")));
        assert!(channels.contains(&json!("Vault UI")));
        assert!(alert["alert_status"]
            .as_str()
            .unwrap()
            .starts_with("Dispatched to Slack + Vault UI"));

        let vulns = result.get("vulnerabilities").unwrap()["vulnerabilities"].as_array().unwrap();
        assert!(!vulns.is_empty());

        let status = result.get("simulation").unwrap()["status"].as_str().unwrap();
        assert!(status == "SUCCESS" || status == "INCONCLUSIVE");
    }

    #[tokio::test]
    async fn test_execution_order_and_context_routing() {
        let pipeline = TestPipeline::standard();
        pipeline.executor.run_pipeline(Record::new()).await;

        assert_eq!(pipeline.call_order(), vec!["intel", "vuln", "impact", "sim", "alert"]);
        assert!(pipeline.call("intel").unwrap().had_context);
        assert!(pipeline.call("vuln").unwrap().had_context);
        assert!(pipeline.call("impact").unwrap().had_context);
        assert!(!pipeline.call("sim").unwrap().had_context);
        assert!(pipeline.call("alert").unwrap().had_context);
    }

    #[tokio::test]
    async fn test_outputs_are_threaded_and_aggregated_unmodified() {
        let pipeline = TestPipeline::standard();
        let input = record_from(json!({
            "region": "Florida-East",
            "indicators": ["CVE-2025-19304", "firmware v2.18"],
            "target_metadata": {"region": "Florida-East", "substation_ids": ["FL-GRID-204"]}
        }));
        let result = pipeline.executor.run_pipeline(input.clone()).await;
        assert_standard_result(&result);

        let intel_call = pipeline.call("intel").unwrap();
        assert_eq!(intel_call.input.payload, input);
        assert!(intel_call.input.side_input.is_empty());

        let vuln_call = pipeline.call("vuln").unwrap();
        assert_eq!(&json!(vuln_call.input.payload), result.get("intel").unwrap());

        let impact_call = pipeline.call("impact").unwrap();
        assert_eq!(&json!(impact_call.input.payload), result.get("vulnerabilities").unwrap());

        let sim_call = pipeline.call("sim").unwrap();
        assert_eq!(&json!(sim_call.input.payload), result.get("vulnerabilities").unwrap());
        assert_eq!(
            sim_call.input.side_input,
            record_from(json!({"region": "Florida-East", "substation_ids": ["FL-GRID-204"]}))
        );

        let alert_call = pipeline.call("alert").unwrap();
        assert_eq!(&json!(alert_call.input.payload), result.get("impact").unwrap());
    }

    #[tokio::test]
    async fn test_token_auth_follows_vault_capability() {
        let pipeline = TestPipeline::standard();
        let result = pipeline.executor.run_pipeline(Record::new()).await;
        assert_eq!(result.get("alert").unwrap()["token_auth"], true);

        pipeline.store.remove_capability(CAP_TOKEN_AUTH);
        let result = pipeline.executor.run_pipeline(Record::new()).await;
        assert_eq!(result.get("alert").unwrap()["token_auth"], false);
    }

    #[tokio::test]
    async fn test_impact_failure_discards_everything() {
        let stages = StandardStages {
            impact: Arc::new(FailingStage::new("impact", "model offline")),
            ..seeded_stages()
        };
        let pipeline = TestPipeline::with_stages(stages);
        let result = pipeline.executor.run_pipeline(Record::new()).await;

        assert_failed_with(&result, "model offline");
        assert_eq!(result.error(), Some("Stage 'impact' failed: model offline"));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"error": "Stage 'impact' failed: model offline"})
        );
        assert_eq!(pipeline.call_order(), vec!["intel", "vuln", "impact"]);
    }

    #[tokio::test]
    async fn test_failure_at_every_position_is_all_or_nothing() {
        for position in ["intel", "vuln", "impact", "sim", "alert"] {
            let failing: Arc<dyn Stage> = Arc::new(FailingStage::new(position, "broken"));
            let mut stages = seeded_stages();
            match position {
                "intel" => stages.intel = failing,
                "vuln" => stages.vuln = failing,
                "impact" => stages.impact = failing,
                "sim" => stages.sim = failing,
                _ => stages.alert = failing,
            }
            let pipeline = TestPipeline::with_stages(stages);
            let result = pipeline.executor.run_pipeline(Record::new()).await;

            assert_failed_with(&result, &format!("Stage '{position}' failed: broken"));
            assert_eq!(pipeline.call_order().last().map(String::as_str), Some(position));
        }
    }

    #[tokio::test]
    async fn test_stage_panic_becomes_failure() {
        let stages = StandardStages {
            vuln: Arc::new(PanickingStage::new("vuln", "index out of range")),
            ..seeded_stages()
        };
        let pipeline = TestPipeline::with_stages(stages);
        let result = pipeline.executor.run_pipeline(Record::new()).await;

        assert_failed_with(&result, "Stage 'vuln' failed: panicked: index out of range");
    }

    #[tokio::test]
    async fn test_failure_is_logged_and_persisted() {
        let stages = StandardStages {
            impact: Arc::new(FailingStage::new("impact", "model offline")),
            ..seeded_stages()
        };
        let pipeline = TestPipeline::with_stages(stages);
        pipeline.executor.run_pipeline(Record::new()).await;

        let persisted = pipeline.logger.persisted();
        assert_eq!(persisted.len(), 2);
        assert_eq!(persisted[0].agent, "impact");
        assert_eq!(persisted[0].event, "Agent error");
        assert_eq!(persisted[0].data["error"], "model offline");
        assert_eq!(persisted[1].agent, "Pipeline");
        assert_eq!(persisted[1].event, "Pipeline execution failed");
    }

    #[tokio::test]
    async fn test_success_logs_each_phase() {
        let pipeline = TestPipeline::standard();
        pipeline.executor.run_pipeline(Record::new()).await;

        for stage in ["intel", "vuln", "impact", "sim", "alert"] {
            let events: Vec<_> = pipeline
                .logger
                .from_source(stage)
                .into_iter()
                .map(|e| e.event)
                .collect();
            assert_eq!(events, vec!["Agent started", "Agent completed"], "stage {stage}");
        }
        assert!(pipeline.logger.persisted().is_empty());

        let vault_events = pipeline.logger.from_source("VaultInit");
        assert_eq!(vault_events.len(), 1);
        assert_eq!(vault_events[0].event, "Loaded Vault metadata for SentiNexuls");
        assert_eq!(vault_events[0].data["vault_id"], "SNX-VLT-001");

        let did_events = pipeline.logger.from_source("DID");
        assert_eq!(did_events.len(), 1);
        assert_eq!(did_events[0].event, "Resolved Vault DID document");
        assert_eq!(did_events[0].data["id"], "did:eonic:sentinexuls");

        let sources: Vec<_> = pipeline.logger.entries().into_iter().map(|e| e.agent).collect();
        assert_eq!(&sources[..4], ["Pipeline", "VaultInit", "DID", "intel"]);

        let pipeline_events = pipeline.logger.from_source("Pipeline");
        let completed = pipeline_events.last().unwrap();
        assert_eq!(completed.event, "Pipeline completed successfully");
        assert_eq!(completed.data["agents_executed"], 5);
        assert_eq!(completed.data["simulation_included"], true);
    }

    #[tokio::test]
    async fn test_unresolved_identity_logs_vault_only() {
        let store = Arc::new(InMemoryConfigStore::default());
        let logger = Arc::new(CollectingEventLogger::new());
        let executor = PipelineExecutor::new(
            Arc::new(standard_graph().unwrap()),
            Arc::new(ContextProvider::new(store)),
        )
        .with_logger(logger.clone());

        executor.run_pipeline(Record::new()).await;
        assert_eq!(logger.from_source("VaultInit").len(), 1);
        assert!(logger.from_source("DID").is_empty());
    }

    #[tokio::test]
    async fn test_context_identical_across_runs() {
        let pipeline = TestPipeline::standard();
        let a = pipeline.executor.run_pipeline(record_from(json!({"region": "A"}))).await;
        let b = pipeline.executor.run_pipeline(record_from(json!({"indicators": []}))).await;
        assert_eq!(
            a.get("impact").unwrap()["audit_endpoint"],
            b.get("impact").unwrap()["audit_endpoint"]
        );
        assert_eq!(a.get("alert").unwrap()["channels"], b.get("alert").unwrap()["channels"]);

        let store = Arc::new(InMemoryConfigStore::default());
        let provider =
            ContextProvider::new(store).with_resolver(Arc::new(crate::testing::fixed_resolver()));
        let a = provider.build_context().unwrap();
        let b = provider.build_context().unwrap();
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[tokio::test]
    async fn test_update_between_runs_is_observed_by_next_run() {
        let pipeline = TestPipeline::standard();
        pipeline.store.update(VaultPatch {
            web4_compliance: Some(false),
            dev_eon_linked: Some(false),
            ..VaultPatch::default()
        });
        let result = pipeline.executor.run_pipeline(Record::new()).await;
        assert_eq!(result.get("alert").unwrap()["alert_status"], "Dispatched to Slack + Vault UI");
    }

    #[tokio::test]
    async fn test_audit_entry_requires_capability() {
        let vault = VaultIdentity {
            vault_capabilities: vec![CAP_TOKEN_AUTH.to_string()],
            ..VaultIdentity::default()
        };
        let pipeline = TestPipeline::with_vault(vault);
        let result = pipeline.executor.run_pipeline(Record::new()).await;
        let impact = result.get("impact").unwrap();
        assert!(impact.get("audit_endpoint").is_none());
        assert!(result.get("intel").unwrap().get("sentient_analysis").is_none());
    }

    #[tokio::test]
    async fn test_resolver_backend_failure_aborts_run() {
        let mut mock = MockIdentityResolver::new();
        mock.expect_resolve()
            .returning(|_| Err(IdentityError::Backend("registry offline".into())));

        let store = Arc::new(InMemoryConfigStore::default());
        let provider = ContextProvider::new(store).with_resolver(Arc::new(mock));
        let logger = Arc::new(CollectingEventLogger::new());
        let executor =
            PipelineExecutor::new(Arc::new(standard_graph().unwrap()), Arc::new(provider))
                .with_logger(logger.clone());

        let result = executor.run_pipeline(Record::new()).await;
        assert_eq!(
            result,
            PipelineResult::Failed {
                error: "Context build failed: Identity resolver failure: registry offline".into()
            }
        );
        // No stage ran.
        assert!(logger.from_source("intel").is_empty());
    }

    #[tokio::test]
    async fn test_resolver_not_found_keeps_running() {
        let mut mock = MockIdentityResolver::new();
        mock.expect_resolve()
            .returning(|did| Err(IdentityError::NotFound(did.to_string())));

        let store = Arc::new(InMemoryConfigStore::default());
        let provider = ContextProvider::new(store).with_resolver(Arc::new(mock));
        let executor =
            PipelineExecutor::new(Arc::new(standard_graph().unwrap()), Arc::new(provider));

        let result = executor.run_pipeline(Record::new()).await;
        assert_standard_result(&result);
        assert!(result.get("impact").unwrap().get("audit_endpoint").is_none());
    }

    #[tokio::test]
    async fn test_concurrent_runs_are_independent() {
        let pipeline = Arc::new(TestPipeline::standard());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let pipeline = pipeline.clone();
                tokio::spawn(async move {
                    let input = record_from(json!({"region": format!("region-{i}")}));
                    pipeline.executor.run_pipeline(input).await
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let result = handle.await.unwrap();
            assert_standard_result(&result);
            assert_eq!(result.get("intel").unwrap()["region"], format!("region-{i}"));
        }
    }
}
