//! DID document types.

use serde::{Deserialize, Serialize};

/// Service type of the audit trail endpoint.
pub const AUDIT_TRAIL: &str = "AuditTrail";
/// Service type of the vault integration endpoint.
pub const VAULT_SERVICE: &str = "VaultService";
/// Service type of the compliance dashboard endpoint.
pub const WEB4_DASHBOARD: &str = "Web4Dashboard";

/// A public key entry used for authentication and verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethod {
    /// Key identifier (`<did>#key-1`).
    pub id: String,
    /// Key suite name.
    #[serde(rename = "type")]
    pub kind: String,
    /// The DID that controls the key.
    pub controller: String,
    /// Base58-encoded public key.
    pub public_key_base58: String,
}

/// A named service endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEndpoint {
    /// Service identifier (`<did>#audit`).
    pub id: String,
    /// Service type, e.g. [`AUDIT_TRAIL`].
    #[serde(rename = "type")]
    pub kind: String,
    /// Endpoint URL.
    pub service_endpoint: String,
    /// Human-readable description.
    pub description: String,
}

/// A resolved DID document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityDocument {
    /// JSON-LD contexts.
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    /// The DID this document describes.
    pub id: String,
    /// Creation time (ISO 8601).
    pub created: String,
    /// Last update time (ISO 8601).
    pub updated: String,
    /// Authentication keys.
    pub authentication: Vec<VerificationMethod>,
    /// Key ids usable for assertions.
    pub assertion_method: Vec<String>,
    /// Service endpoints.
    pub service: Vec<ServiceEndpoint>,
    /// Verification keys.
    pub verification_method: Vec<VerificationMethod>,
}

impl IdentityDocument {
    /// Returns the services of the given type, or all services when `kind` is `None`.
    #[must_use]
    pub fn services(&self, kind: Option<&str>) -> Vec<&ServiceEndpoint> {
        self.service
            .iter()
            .filter(|s| kind.map_or(true, |k| s.kind == k))
            .collect()
    }

    /// Returns the first audit trail endpoint URL.
    #[must_use]
    pub fn audit_endpoint(&self) -> Option<&str> {
        self.services(Some(AUDIT_TRAIL))
            .first()
            .map(|s| s.service_endpoint.as_str())
    }
}

/// The enrichment attached to a pipeline context when the vault DID resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DidContext {
    /// The vault DID.
    pub vault_did: String,
    /// The resolved document.
    pub did_document: IdentityDocument,
    /// The audit trail endpoint, if the document declares one.
    pub audit_endpoint: Option<String>,
    /// All service endpoints.
    pub services: Vec<ServiceEndpoint>,
    /// Whether at least one authentication key is present.
    pub authentication_ready: bool,
    /// Whether the document declares a compliance dashboard.
    pub web4_compliant: bool,
}

impl DidContext {
    /// Derives the enrichment from a resolved document.
    #[must_use]
    pub fn from_document(vault_did: impl Into<String>, did_document: IdentityDocument) -> Self {
        let audit_endpoint = did_document.audit_endpoint().map(str::to_string);
        let services = did_document.service.clone();
        let authentication_ready = !did_document.authentication.is_empty();
        let web4_compliant = did_document
            .service
            .iter()
            .any(|s| s.kind == WEB4_DASHBOARD);

        Self {
            vault_did: vault_did.into(),
            did_document,
            audit_endpoint,
            services,
            authentication_ready,
            web4_compliant,
        }
    }
}
