//! Tests for context construction.

#[cfg(test)]
mod tests {
    use crate::context::{
        ConfigProvider, ContextProvider, InMemoryConfigStore, PipelineContext, VaultIdentity,
        VaultPatch, CAP_TOKEN_AUTH,
    };
    use crate::did::{DidResolver, MockIdentityResolver, AUDIT_TRAIL};
    use crate::errors::{IdentityError, PipelineError};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn store() -> Arc<InMemoryConfigStore> {
        Arc::new(InMemoryConfigStore::default())
    }

    fn fixed_resolver() -> Arc<DidResolver> {
        Arc::new(DidResolver::new(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()))
    }

    #[test]
    fn test_without_resolver_has_no_enrichment() {
        let provider = ContextProvider::new(store());
        let ctx = provider.build_context().unwrap();
        assert!(ctx.identity_document().is_none());
        assert_eq!(ctx.vault_identity(), &VaultIdentity::default());

        // Second build still succeeds; the missing resolver is only reported once.
        assert!(provider.build_context().is_ok());
    }

    #[test]
    fn test_with_resolver_attaches_document() {
        let provider = ContextProvider::new(store()).with_resolver(fixed_resolver());
        let ctx = provider.build_context().unwrap();

        let doc = ctx.identity_document().unwrap();
        assert_eq!(doc.vault_did, "did:eonic:sentinexuls");
        assert_eq!(doc.audit_endpoint.as_deref(), Some("https://audit.eonicvault.net"));
        assert!(doc.authentication_ready);
        assert!(doc.web4_compliant);
        assert_eq!(doc.services.len(), 3);
        assert_eq!(doc.services[0].kind, AUDIT_TRAIL);
    }

    #[test]
    fn test_context_build_is_idempotent() {
        let provider = ContextProvider::new(store()).with_resolver(fixed_resolver());
        let first = serde_json::to_string(&provider.build_context().unwrap()).unwrap();
        let second = serde_json::to_string(&provider.build_context().unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_malformed_did_skips_enrichment() {
        let store = store();
        store.update(VaultPatch {
            vault_did: Some("eonic-without-prefix".into()),
            ..VaultPatch::default()
        });
        let provider = ContextProvider::new(store).with_resolver(fixed_resolver());
        let ctx = provider.build_context().unwrap();
        assert!(ctx.identity_document().is_none());
    }

    #[test]
    fn test_not_found_skips_enrichment() {
        let mut mock = MockIdentityResolver::new();
        mock.expect_resolve()
            .times(1)
            .returning(|did| Err(IdentityError::NotFound(did.to_string())));

        let provider = ContextProvider::new(store()).with_resolver(Arc::new(mock));
        let ctx = provider.build_context().unwrap();
        assert!(ctx.identity_document().is_none());
    }

    #[test]
    fn test_backend_failure_is_fatal() {
        let mut mock = MockIdentityResolver::new();
        mock.expect_resolve()
            .returning(|_| Err(IdentityError::Backend("registry offline".into())));

        let provider = ContextProvider::new(store()).with_resolver(Arc::new(mock));
        let err = provider.build_context().unwrap_err();
        assert!(matches!(err, PipelineError::Context(IdentityError::Backend(_))));
        assert_eq!(
            err.to_string(),
            "Context build failed: Identity resolver failure: registry offline"
        );
    }

    #[test]
    fn test_resolver_receives_vault_did() {
        let mut mock = MockIdentityResolver::new();
        mock.expect_resolve()
            .withf(|did| did == "did:eonic:sentinexuls")
            .times(1)
            .returning(|did| Err(IdentityError::NotFound(did.to_string())));

        let provider = ContextProvider::new(store()).with_resolver(Arc::new(mock));
        provider.build_context().unwrap();
    }

    #[test]
    fn test_snapshot_not_affected_by_later_update() {
        let store = store();
        let provider = ContextProvider::new(store.clone());
        let ctx = provider.build_context().unwrap();

        store.remove_capability(CAP_TOKEN_AUTH);

        assert!(ctx.has_capability(CAP_TOKEN_AUTH));
        assert!(!provider.build_context().unwrap().has_capability(CAP_TOKEN_AUTH));
    }

    #[test]
    fn test_pipeline_context_serializes_without_enrichment() {
        let ctx = PipelineContext::new(VaultIdentity::default());
        let value = serde_json::to_value(&ctx).unwrap();
        assert!(value.get("identity_document").is_none());
        assert_eq!(value["vault_identity"]["vault_id"], "SNX-VLT-001");
    }
}
