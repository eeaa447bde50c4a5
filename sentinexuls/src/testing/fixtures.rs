//! Test fixtures for pipeline testing.

use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

use super::{RecordedCall, RecordingStage};
use crate::context::{ContextProvider, InMemoryConfigStore, VaultIdentity};
use crate::did::DidResolver;
use crate::events::CollectingEventLogger;
use crate::pipeline::{standard_graph_with, PipelineExecutor, StandardStages};
use crate::simulation::BreachSimulator;

/// A resolver whose documents are stamped 2025-06-01T00:00:00.
#[must_use]
pub fn fixed_resolver() -> DidResolver {
    DidResolver::new(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).single().unwrap_or_default())
}

/// The standard pipeline wired with in-memory collaborators.
///
/// Every stage is wrapped in a [`RecordingStage`] so tests can inspect the
/// order, inputs and context of each call.
pub struct TestPipeline {
    /// The executor under test.
    pub executor: PipelineExecutor,
    /// The vault store behind the context provider.
    pub store: Arc<InMemoryConfigStore>,
    /// Every logged event.
    pub logger: Arc<CollectingEventLogger>,
    /// Every stage call, in order.
    pub journal: Arc<Mutex<Vec<RecordedCall>>>,
}

impl std::fmt::Debug for TestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestPipeline")
            .field("executor", &self.executor)
            .finish_non_exhaustive()
    }
}

impl TestPipeline {
    /// The default agents with a seeded simulator and the default vault.
    #[must_use]
    pub fn standard() -> Self {
        Self::with_stages(StandardStages::with_simulator(Arc::new(BreachSimulator::with_seed(42))))
    }

    /// The given agents with the default vault.
    #[must_use]
    pub fn with_stages(stages: StandardStages) -> Self {
        Self::build(stages, VaultIdentity::default())
    }

    /// The default agents with the given vault.
    #[must_use]
    pub fn with_vault(vault: VaultIdentity) -> Self {
        Self::build(
            StandardStages::with_simulator(Arc::new(BreachSimulator::with_seed(42))),
            vault,
        )
    }

    fn build(stages: StandardStages, vault: VaultIdentity) -> Self {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let wrap = |stage| -> Arc<dyn crate::stages::Stage> {
            Arc::new(RecordingStage::wrapping(stage, journal.clone()))
        };
        let recorded = StandardStages {
            intel: wrap(stages.intel),
            vuln: wrap(stages.vuln),
            impact: wrap(stages.impact),
            sim: wrap(stages.sim),
            alert: wrap(stages.alert),
        };

        let store = Arc::new(InMemoryConfigStore::new(vault));
        let logger = Arc::new(CollectingEventLogger::new());
        let provider =
            ContextProvider::new(store.clone()).with_resolver(Arc::new(fixed_resolver()));
        let graph = match standard_graph_with(recorded) {
            Ok(graph) => graph,
            Err(e) => panic!("standard graph is valid: {e}"),
        };
        let executor = PipelineExecutor::new(Arc::new(graph), Arc::new(provider))
            .with_logger(logger.clone());

        Self {
            executor,
            store,
            logger,
            journal,
        }
    }

    /// Returns the names of the stages called, in order.
    #[must_use]
    pub fn call_order(&self) -> Vec<String> {
        self.journal.lock().iter().map(|c| c.stage.clone()).collect()
    }

    /// Returns the recorded call of one stage.
    #[must_use]
    pub fn call(&self, stage: &str) -> Option<RecordedCall> {
        self.journal.lock().iter().find(|c| c.stage == stage).cloned()
    }
}
