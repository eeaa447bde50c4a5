//! DID resolution and DID-authenticated audit entries.

use super::document::{
    IdentityDocument, ServiceEndpoint, VerificationMethod, AUDIT_TRAIL, VAULT_SERVICE,
    WEB4_DASHBOARD,
};
use crate::errors::IdentityError;
use crate::utils::{format_iso, now_utc, Timestamp};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const ED25519_SUITE: &str = "Ed25519VerificationKey2020";
const VAULT_PUBLIC_KEY: &str = "Fj4A9f8ZmN7K3pQ2vR8sT1uW6xY9zA2bC4dE5fG7hI8jK9lM0nO1pQ2rS3tU4vW5x";

/// Looks up identity documents by DID.
///
/// Implementations return [`IdentityError::NotFound`] or
/// [`IdentityError::InvalidFormat`] for lookups that simply have no answer,
/// and reserve [`IdentityError::Backend`] for a broken resolver.
#[cfg_attr(test, mockall::automock)]
pub trait IdentityResolver: Send + Sync {
    /// Resolves a DID to its document.
    fn resolve(&self, did: &str) -> Result<IdentityDocument, IdentityError>;
}

/// Returns true if `did` is a `did:` URI with something after the scheme.
///
/// The method and identifier are not checked, so `did:Eonic:x` and
/// `did:eonic:` both pass.
#[must_use]
pub fn is_valid_did(did: &str) -> bool {
    did.strip_prefix("did:").is_some_and(|rest| !rest.is_empty())
}

/// Deterministic local resolver for vault DIDs.
///
/// Every well-formed DID resolves to the same document shape: one Ed25519
/// key plus the audit, vault and compliance-dashboard services. The
/// `created`/`updated` stamps are the resolver's issue time.
#[derive(Debug, Clone)]
pub struct DidResolver {
    issued_at: Timestamp,
    audit_url: String,
    vault_url: String,
    dashboard_url: String,
}

impl Default for DidResolver {
    fn default() -> Self {
        Self::new(now_utc())
    }
}

impl DidResolver {
    /// Creates a resolver that stamps documents with `issued_at`.
    #[must_use]
    pub fn new(issued_at: Timestamp) -> Self {
        Self {
            issued_at,
            audit_url: "https://audit.eonicvault.net".to_string(),
            vault_url: "https://vault.eonicvault.net".to_string(),
            dashboard_url: "https://web4.eonicvault.net".to_string(),
        }
    }

    /// Overrides the audit trail endpoint URL.
    #[must_use]
    pub fn with_audit_url(mut self, url: impl Into<String>) -> Self {
        self.audit_url = url.into();
        self
    }

    fn key(did: &str) -> VerificationMethod {
        VerificationMethod {
            id: format!("{did}#key-1"),
            kind: ED25519_SUITE.to_string(),
            controller: did.to_string(),
            public_key_base58: VAULT_PUBLIC_KEY.to_string(),
        }
    }

    fn service(
        did: &str,
        fragment: &str,
        kind: &str,
        url: &str,
        description: &str,
    ) -> ServiceEndpoint {
        ServiceEndpoint {
            id: format!("{did}#{fragment}"),
            kind: kind.to_string(),
            service_endpoint: url.to_string(),
            description: description.to_string(),
        }
    }
}

impl IdentityResolver for DidResolver {
    fn resolve(&self, did: &str) -> Result<IdentityDocument, IdentityError> {
        if !is_valid_did(did) {
            return Err(IdentityError::InvalidFormat(did.to_string()));
        }

        let stamp = format_iso(&self.issued_at);
        Ok(IdentityDocument {
            context: vec![
                "https://w3id.org/did/v1".to_string(),
                "https://w3id.org/security/v2".to_string(),
            ],
            id: did.to_string(),
            created: stamp.clone(),
            updated: stamp,
            authentication: vec![Self::key(did)],
            assertion_method: vec![format!("{did}#key-1")],
            service: vec![
                Self::service(
                    did,
                    "audit",
                    AUDIT_TRAIL,
                    &self.audit_url,
                    "SentiNexuls audit trail service",
                ),
                Self::service(
                    did,
                    "vault",
                    VAULT_SERVICE,
                    &self.vault_url,
                    "EONIC Vault integration endpoint",
                ),
                Self::service(
                    did,
                    "web4",
                    WEB4_DASHBOARD,
                    &self.dashboard_url,
                    "Web4 compliance dashboard",
                ),
            ],
            verification_method: vec![Self::key(did)],
        })
    }
}

/// An audit record attributed to a DID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the entry was created.
    pub timestamp: String,
    /// The acting DID.
    pub did: String,
    /// What was done.
    pub action: String,
    /// Payload the entry covers.
    pub data: serde_json::Value,
    /// `audit_<unix seconds>`.
    pub audit_id: String,
    /// `sig_` followed by a digest of the payload.
    pub signature: String,
}

/// Creates a DID-authenticated audit entry for `data`.
///
/// The signature is simulated: a SHA-256 digest over the DID, action and
/// canonical payload, so identical inputs sign identically.
#[must_use]
pub fn create_audit_entry(
    did: &str,
    action: &str,
    data: serde_json::Value,
    at: &Timestamp,
) -> AuditEntry {
    let mut hasher = Sha256::new();
    hasher.update(did.as_bytes());
    hasher.update(action.as_bytes());
    hasher.update(data.to_string().as_bytes());
    let digest = hex::encode(hasher.finalize());

    AuditEntry {
        timestamp: format_iso(at),
        did: did.to_string(),
        action: action.to_string(),
        data,
        audit_id: format!("audit_{}", at.timestamp()),
        signature: format!("sig_{}", &digest[..16]),
    }
}

/// Checks a simulated signature against a DID.
///
/// The DID must resolve and the signature must look like one produced by
/// [`create_audit_entry`].
#[must_use]
pub fn verify_signature(resolver: &dyn IdentityResolver, did: &str, signature: &str) -> bool {
    resolver.resolve(did).is_ok() && signature.len() > 10 && signature.starts_with("sig_")
}
