//! Decentralized identifier (DID) lookup.
//!
//! The resolver is an optional collaborator of the context provider: when
//! present, the vault DID is resolved into a [`DidContext`] enrichment.

mod document;
mod resolver;

pub use document::{
    DidContext, IdentityDocument, ServiceEndpoint, VerificationMethod, AUDIT_TRAIL, VAULT_SERVICE,
    WEB4_DASHBOARD,
};
#[cfg(test)]
pub use resolver::MockIdentityResolver;
pub use resolver::{
    create_audit_entry, is_valid_did, verify_signature, AuditEntry, DidResolver, IdentityResolver,
};
