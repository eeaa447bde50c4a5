//! The immutable per-run pipeline context.

use super::VaultIdentity;
use crate::did::DidContext;
use serde::{Deserialize, Serialize};

/// Read-only snapshot handed to every stage of one run.
///
/// Built once by [`ContextProvider`](super::ContextProvider) before the first
/// stage. Stages only ever see `&PipelineContext`, so they cannot write back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineContext {
    vault_identity: VaultIdentity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    identity_document: Option<DidContext>,
}

impl PipelineContext {
    /// Creates a context without identity enrichment.
    #[must_use]
    pub fn new(vault_identity: VaultIdentity) -> Self {
        Self {
            vault_identity,
            identity_document: None,
        }
    }

    /// Attaches the resolved identity document.
    #[must_use]
    pub fn with_identity_document(mut self, document: DidContext) -> Self {
        self.identity_document = Some(document);
        self
    }

    /// Returns the vault identity.
    #[must_use]
    pub fn vault_identity(&self) -> &VaultIdentity {
        &self.vault_identity
    }

    /// Returns the identity document enrichment, if resolved.
    #[must_use]
    pub fn identity_document(&self) -> Option<&DidContext> {
        self.identity_document.as_ref()
    }

    /// Returns true if the vault has the capability.
    #[must_use]
    pub fn has_capability(&self, capability: &str) -> bool {
        self.vault_identity.has_capability(capability)
    }
}
