//! Vault identity configuration and the injectable store that holds it.

use crate::utils::iso_timestamp;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Capability that enables token-authenticated alert dispatch.
pub const CAP_TOKEN_AUTH: &str = "token-auth infrastructure";
/// Capability that enables DID-authenticated audit entries.
pub const CAP_DID_AUDITS: &str = "DID-authenticated audits";
/// Capability that enables sentient intel analysis.
pub const CAP_SENTIENT_AGENTS: &str = "sentient_agents";
/// Capability that enables adaptive vulnerability signatures.
pub const CAP_SELF_EVOLVING: &str = "self-evolving defenses";
/// Capability for custom breach scenarios.
pub const CAP_BREACH_RITUALS: &str = "custom breach rituals";

/// Vault-level identity and capability metadata.
///
/// Missing fields deserialize to the built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultIdentity {
    /// Vault identifier.
    pub vault_id: String,
    /// ENICO status (`active` when operational).
    #[serde(rename = "ENICO_status")]
    pub enico_status: String,
    /// Whether the DEV-EON network is linked.
    #[serde(rename = "DEV_EON_linked")]
    pub dev_eon_linked: bool,
    /// Whether web4 compliance is enabled.
    pub web4_compliance: bool,
    /// Chain the vault originates from.
    pub origin_chain: String,
    /// Project token symbol.
    pub project_token: String,
    /// The vault DID.
    #[serde(rename = "vault_DID")]
    pub vault_did: String,
    /// Enabled capabilities.
    pub vault_capabilities: Vec<String>,
    /// Configuration version.
    pub vault_version: String,
    /// Set by [`InMemoryConfigStore::initialize`].
    pub initialization_timestamp: Option<String>,
    /// Set whenever the capability list changes.
    pub last_capability_update: Option<String>,
    /// Security level label.
    pub security_level: String,
    /// Whether agents run autonomously.
    pub autonomous_mode: bool,
}

impl Default for VaultIdentity {
    fn default() -> Self {
        Self {
            vault_id: "SNX-VLT-001".to_string(),
            enico_status: "active".to_string(),
            dev_eon_linked: true,
            web4_compliance: true,
            origin_chain: "Solana".to_string(),
            project_token: "$SNX".to_string(),
            vault_did: "did:eonic:sentinexuls".to_string(),
            vault_capabilities: [
                CAP_SENTIENT_AGENTS,
                CAP_SELF_EVOLVING,
                CAP_TOKEN_AUTH,
                CAP_BREACH_RITUALS,
                CAP_DID_AUDITS,
            ]
            .iter()
            .map(|c| (*c).to_string())
            .collect(),
            vault_version: "1.0.0".to_string(),
            initialization_timestamp: None,
            last_capability_update: None,
            security_level: "MAXIMUM".to_string(),
            autonomous_mode: true,
        }
    }
}

impl VaultIdentity {
    /// Returns true if the capability is enabled.
    #[must_use]
    pub fn has_capability(&self, capability: &str) -> bool {
        self.vault_capabilities.iter().any(|c| c == capability)
    }

    /// A vault is active when ENICO is active, DEV-EON is linked and web4
    /// compliance is on.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.enico_status == "active" && self.dev_eon_linked && self.web4_compliance
    }

    /// `ADVANCED` with five or more capabilities, otherwise `BASIC`.
    #[must_use]
    pub fn evolution_stage(&self) -> &'static str {
        if self.vault_capabilities.len() >= 5 {
            "ADVANCED"
        } else {
            "BASIC"
        }
    }

    /// Checks required fields and flags soft problems.
    #[must_use]
    pub fn validate_integrity(&self) -> IntegrityReport {
        let mut report = IntegrityReport {
            valid: true,
            issues: Vec::new(),
            warnings: Vec::new(),
        };

        for (field, value) in [
            ("vault_id", &self.vault_id),
            ("ENICO_status", &self.enico_status),
        ] {
            if value.trim().is_empty() {
                report.valid = false;
                report.issues.push(format!("Missing required field: {field}"));
            }
        }
        if self.vault_capabilities.is_empty() {
            report.warnings.push("No vault capabilities defined".to_string());
        }
        if !self.web4_compliance {
            report.warnings.push("Web4 compliance not enabled".to_string());
        }

        report
    }
}

/// Result of [`VaultIdentity::validate_integrity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    /// False when a required field is missing.
    pub valid: bool,
    /// Blocking problems.
    pub issues: Vec<String>,
    /// Non-blocking problems.
    pub warnings: Vec<String>,
}

/// A partial update of the vault identity. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VaultPatch {
    /// New ENICO status.
    #[serde(default, rename = "ENICO_status")]
    pub enico_status: Option<String>,
    /// New DEV-EON link flag.
    #[serde(default, rename = "DEV_EON_linked")]
    pub dev_eon_linked: Option<bool>,
    /// New web4 compliance flag.
    #[serde(default)]
    pub web4_compliance: Option<bool>,
    /// Replacement capability list.
    #[serde(default)]
    pub vault_capabilities: Option<Vec<String>>,
    /// New security level.
    #[serde(default)]
    pub security_level: Option<String>,
    /// New autonomous mode flag.
    #[serde(default)]
    pub autonomous_mode: Option<bool>,
    /// New vault DID.
    #[serde(default, rename = "vault_DID")]
    pub vault_did: Option<String>,
}

impl VaultPatch {
    /// Applies the patch, stamping `last_capability_update` when the
    /// capability list changes.
    pub fn apply(self, vault: &mut VaultIdentity) {
        if let Some(v) = self.enico_status {
            vault.enico_status = v;
        }
        if let Some(v) = self.dev_eon_linked {
            vault.dev_eon_linked = v;
        }
        if let Some(v) = self.web4_compliance {
            vault.web4_compliance = v;
        }
        if let Some(v) = self.security_level {
            vault.security_level = v;
        }
        if let Some(v) = self.autonomous_mode {
            vault.autonomous_mode = v;
        }
        if let Some(v) = self.vault_did {
            vault.vault_did = v;
        }
        if let Some(caps) = self.vault_capabilities {
            if caps != vault.vault_capabilities {
                vault.vault_capabilities = caps;
                vault.last_capability_update = Some(iso_timestamp());
            }
        }
    }
}

/// Process-wide source of the vault identity.
///
/// The context provider calls [`get`](Self::get) once per run; administrative
/// code calls [`update`](Self::update). A run never sees an update issued
/// after its snapshot was taken.
pub trait ConfigProvider: Send + Sync {
    /// Returns a snapshot of the current vault identity.
    fn get(&self) -> VaultIdentity;

    /// Applies a patch and returns the new vault identity.
    fn update(&self, patch: VaultPatch) -> VaultIdentity;
}

/// Startup status returned by [`InMemoryConfigStore::initialize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultStartupStatus {
    /// When the vault was initialized.
    pub initialized_at: String,
    /// Vault identifier.
    pub vault_id: String,
    /// Number of capabilities.
    pub capabilities_count: usize,
    /// ENICO status.
    pub enico_status: String,
    /// DEV-EON link flag.
    pub dev_eon_linked: bool,
    /// Web4 compliance flag.
    pub web4_compliance: bool,
    /// Autonomous mode flag.
    pub autonomous_mode: bool,
    /// Security level.
    pub security_level: String,
}

/// In-memory [`ConfigProvider`].
#[derive(Debug, Default)]
pub struct InMemoryConfigStore {
    vault: RwLock<VaultIdentity>,
}

impl InMemoryConfigStore {
    /// Creates a store seeded with `vault`.
    #[must_use]
    pub fn new(vault: VaultIdentity) -> Self {
        Self {
            vault: RwLock::new(vault),
        }
    }

    /// Stamps the initialization time and reports startup status.
    pub fn initialize(&self) -> VaultStartupStatus {
        let mut vault = self.vault.write();
        let now = iso_timestamp();
        vault.initialization_timestamp = Some(now.clone());

        VaultStartupStatus {
            initialized_at: now,
            vault_id: vault.vault_id.clone(),
            capabilities_count: vault.vault_capabilities.len(),
            enico_status: vault.enico_status.clone(),
            dev_eon_linked: vault.dev_eon_linked,
            web4_compliance: vault.web4_compliance,
            autonomous_mode: vault.autonomous_mode,
            security_level: vault.security_level.clone(),
        }
    }

    /// Returns true if the capability is enabled.
    #[must_use]
    pub fn has_capability(&self, capability: &str) -> bool {
        self.vault.read().has_capability(capability)
    }

    /// Adds a capability. Returns false if it was already present.
    pub fn add_capability(&self, capability: &str) -> bool {
        let mut vault = self.vault.write();
        if vault.has_capability(capability) {
            return false;
        }
        vault.vault_capabilities.push(capability.to_string());
        vault.last_capability_update = Some(iso_timestamp());
        true
    }

    /// Removes a capability. Returns false if it was not present.
    pub fn remove_capability(&self, capability: &str) -> bool {
        let mut vault = self.vault.write();
        let before = vault.vault_capabilities.len();
        vault.vault_capabilities.retain(|c| c != capability);
        if vault.vault_capabilities.len() == before {
            return false;
        }
        vault.last_capability_update = Some(iso_timestamp());
        true
    }

    /// Summarizes the vault for the status endpoints.
    #[must_use]
    pub fn stats(&self) -> VaultStats {
        let vault = self.vault.read();
        VaultStats {
            vault_id: vault.vault_id.clone(),
            total_capabilities: vault.vault_capabilities.len(),
            evolution_stage: vault.evolution_stage().to_string(),
            is_active: vault.is_active(),
            security_level: vault.security_level.clone(),
            last_capability_update: vault.last_capability_update.clone(),
            initialized_at: vault.initialization_timestamp.clone(),
        }
    }
}

/// Summary returned by [`InMemoryConfigStore::stats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultStats {
    /// Vault identifier.
    pub vault_id: String,
    /// Number of enabled capabilities.
    pub total_capabilities: usize,
    /// `ADVANCED` or `BASIC`.
    pub evolution_stage: String,
    /// See [`VaultIdentity::is_active`].
    pub is_active: bool,
    /// Security level.
    pub security_level: String,
    /// Last capability change, if any.
    pub last_capability_update: Option<String>,
    /// Initialization time, if initialized.
    pub initialized_at: Option<String>,
}

impl ConfigProvider for InMemoryConfigStore {
    fn get(&self) -> VaultIdentity {
        self.vault.read().clone()
    }

    fn update(&self, patch: VaultPatch) -> VaultIdentity {
        let mut vault = self.vault.write();
        patch.apply(&mut vault);
        vault.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vault() {
        let vault = VaultIdentity::default();
        assert_eq!(vault.vault_id, "SNX-VLT-001");
        assert_eq!(vault.vault_capabilities.len(), 5);
        assert!(vault.has_capability(CAP_TOKEN_AUTH));
        assert!(vault.is_active());
        assert_eq!(vault.evolution_stage(), "ADVANCED");
    }

    #[test]
    fn test_wire_names() {
        let value = serde_json::to_value(VaultIdentity::default()).unwrap();
        assert_eq!(value["ENICO_status"], "active");
        assert_eq!(value["DEV_EON_linked"], true);
        assert_eq!(value["vault_DID"], "did:eonic:sentinexuls");
        assert!(value["initialization_timestamp"].is_null());
    }

    #[test]
    fn test_inactive_when_unlinked() {
        let vault = VaultIdentity {
            dev_eon_linked: false,
            ..VaultIdentity::default()
        };
        assert!(!vault.is_active());
    }

    #[test]
    fn test_integrity_report() {
        let vault = VaultIdentity {
            vault_id: String::new(),
            vault_capabilities: Vec::new(),
            web4_compliance: false,
            ..VaultIdentity::default()
        };
        let report = vault.validate_integrity();
        assert!(!report.valid);
        assert_eq!(report.issues, vec!["Missing required field: vault_id"]);
        assert_eq!(report.warnings.len(), 2);
        assert_eq!(vault.evolution_stage(), "BASIC");
    }

    #[test]
    fn test_store_update_applies_patch() {
        let store = InMemoryConfigStore::default();
        let updated = store.update(VaultPatch {
            security_level: Some("HIGH".into()),
            autonomous_mode: Some(false),
            ..VaultPatch::default()
        });
        assert_eq!(updated.security_level, "HIGH");
        assert!(!updated.autonomous_mode);
        assert_eq!(store.get(), updated);
        assert!(updated.last_capability_update.is_none());
    }

    #[test]
    fn test_patch_stamps_capability_change() {
        let store = InMemoryConfigStore::default();
        let updated = store.update(VaultPatch {
            vault_capabilities: Some(vec![CAP_TOKEN_AUTH.into()]),
            ..VaultPatch::default()
        });
        assert_eq!(updated.vault_capabilities, vec![CAP_TOKEN_AUTH]);
        assert!(updated.last_capability_update.is_some());
    }

    #[test]
    fn test_patch_rejects_unknown_fields() {
        let result: Result<VaultPatch, _> =
            serde_json::from_value(serde_json::json!({"vault_id": "x"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_add_remove_capability() {
        let store = InMemoryConfigStore::default();
        assert!(!store.add_capability(CAP_TOKEN_AUTH));
        assert!(store.remove_capability(CAP_TOKEN_AUTH));
        assert!(!store.has_capability(CAP_TOKEN_AUTH));
        assert!(!store.remove_capability(CAP_TOKEN_AUTH));
        assert!(store.add_capability(CAP_TOKEN_AUTH));
        assert!(store.get().last_capability_update.is_some());
    }

    #[test]
    fn test_initialize() {
        let store = InMemoryConfigStore::default();
        let status = store.initialize();
        assert_eq!(status.vault_id, "SNX-VLT-001");
        assert_eq!(status.capabilities_count, 5);
        assert_eq!(store.get().initialization_timestamp, Some(status.initialized_at));
    }

    #[test]
    fn test_stats() {
        let store = InMemoryConfigStore::default();
        store.remove_capability(CAP_BREACH_RITUALS);
        let stats = store.stats();
        assert_eq!(stats.total_capabilities, 4);
        assert_eq!(stats.evolution_stage, "BASIC");
        assert!(stats.is_active);
        assert!(stats.initialized_at.is_none());
        assert!(stats.last_capability_update.is_some());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let store = InMemoryConfigStore::default();
        let snapshot = store.get();
        store.remove_capability(CAP_TOKEN_AUTH);
        assert!(snapshot.has_capability(CAP_TOKEN_AUTH));
    }
}
