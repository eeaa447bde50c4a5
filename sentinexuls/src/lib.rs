//! # SentiNexuls
//!
//! Agent orchestration pipeline for the SentiNexuls threat platform.
//!
//! A run threads one input through five mock agents:
//!
//! - **intel**: sweeps threat feeds for indicators
//! - **vuln**: maps indicators to vulnerabilities
//! - **impact**: scores the impact, optionally stamping a DID audit entry
//! - **sim**: simulates a breach against the vulnerabilities (side branch)
//! - **alert**: dispatches the impact assessment
//!
//! Stages share a read-only [`PipelineContext`](context::PipelineContext)
//! built once per run from the vault identity. A failure in any step aborts
//! the run with a single `{"error": ...}` result.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sentinexuls::prelude::*;
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryConfigStore::default());
//! let provider = ContextProvider::new(store).with_resolver(Arc::new(DidResolver::default()));
//! let executor = PipelineExecutor::new(Arc::new(standard_graph()?), Arc::new(provider));
//!
//! let result = executor.run_pipeline(Record::new()).await;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod context;
pub mod core;
pub mod did;
pub mod errors;
pub mod events;
pub mod pipeline;
pub mod report;
pub mod simulation;
pub mod stages;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::context::{
        ConfigProvider, ContextProvider, InMemoryConfigStore, PipelineContext, RunIdentity,
        VaultIdentity, VaultPatch,
    };
    pub use crate::core::{record_from, Record, RecordExt, SimulationStatus, StagePhase};
    pub use crate::did::{DidContext, DidResolver, IdentityDocument, IdentityResolver};
    pub use crate::errors::{
        ContractErrorInfo, CycleDetectedError, IdentityError, PipelineError,
        PipelineValidationError, StageError,
    };
    pub use crate::events::{
        EventLogger, JsonlEventLogger, NoOpEventLogger, SimulatedChainPublisher,
    };
    pub use crate::pipeline::{
        standard_graph, PipelineBuilder, PipelineExecutor, PipelineResult, ResultAggregator,
        StageGraph, StageSpec, StandardStages,
    };
    pub use crate::simulation::{BreachSimulator, ScenarioType};
    pub use crate::stages::{Stage, StageInput};
    pub use crate::utils::{iso_timestamp, Timestamp};
}
