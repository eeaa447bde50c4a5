//! Builds the per-run [`PipelineContext`].

use super::{ConfigProvider, PipelineContext};
use crate::did::{DidContext, IdentityResolver};
use crate::errors::PipelineError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Produces one [`PipelineContext`] per run.
///
/// The vault identity is read from the [`ConfigProvider`] exactly once per
/// call. When an [`IdentityResolver`] is configured, the vault DID is
/// resolved into a [`DidContext`]:
///
/// - a resolved document is attached as the identity enrichment;
/// - `NotFound` / `InvalidFormat` are logged and the enrichment is omitted;
/// - a `Backend` failure aborts the build with [`PipelineError::Context`].
pub struct ContextProvider {
    config: Arc<dyn ConfigProvider>,
    resolver: Option<Arc<dyn IdentityResolver>>,
    missing_resolver_reported: AtomicBool,
}

impl std::fmt::Debug for ContextProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextProvider")
            .field("resolver", &self.resolver.is_some())
            .finish_non_exhaustive()
    }
}

impl ContextProvider {
    /// Creates a provider without an identity resolver.
    #[must_use]
    pub fn new(config: Arc<dyn ConfigProvider>) -> Self {
        Self {
            config,
            resolver: None,
            missing_resolver_reported: AtomicBool::new(false),
        }
    }

    /// Sets the identity resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn IdentityResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Returns the configuration source.
    #[must_use]
    pub fn config(&self) -> &Arc<dyn ConfigProvider> {
        &self.config
    }

    /// Builds the context for one run.
    pub fn build_context(&self) -> Result<PipelineContext, PipelineError> {
        let vault = self.config.get();
        let did = vault.vault_did.clone();
        let context = PipelineContext::new(vault);

        let Some(resolver) = &self.resolver else {
            if !self.missing_resolver_reported.swap(true, Ordering::Relaxed) {
                warn!("No identity resolver configured; running without identity enrichment");
            }
            return Ok(context);
        };

        match resolver.resolve(&did) {
            Ok(document) => {
                debug!(
                    did = %did,
                    services = document.service.len(),
                    "Resolved vault identity document"
                );
                Ok(context.with_identity_document(DidContext::from_document(did, document)))
            }
            Err(e) if e.is_sentinel() => {
                warn!(
                    did = %did,
                    error = %e,
                    "Identity document unavailable; continuing without enrichment"
                );
                Ok(context)
            }
            Err(e) => Err(PipelineError::Context(e)),
        }
    }
}
