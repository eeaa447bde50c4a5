//! Context management for pipeline execution.
//!
//! This module provides:
//! - The vault identity and the injectable store that holds it
//! - The immutable per-run [`PipelineContext`]
//! - The [`ContextProvider`] that builds one context per run

#[cfg(test)]
mod context_tests;
mod identity;
mod provider;
mod snapshot;
mod vault;

pub use identity::RunIdentity;
pub use provider::ContextProvider;
pub use snapshot::PipelineContext;
pub use vault::{
    ConfigProvider, InMemoryConfigStore, IntegrityReport, VaultIdentity, VaultPatch,
    VaultStartupStatus, VaultStats, CAP_BREACH_RITUALS, CAP_DID_AUDITS, CAP_SELF_EVOLVING,
    CAP_SENTIENT_AGENTS, CAP_TOKEN_AUTH,
};
