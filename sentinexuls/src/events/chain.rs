//! On-chain persistence of log entries.
//!
//! Only a simulated publisher exists: it keeps published entries in memory
//! and hands back a fake transaction hash.

use super::LogEntry;
use crate::errors::PublishError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Publishes log entries to an external ledger.
pub trait ChainPublisher: Send + Sync {
    /// Publishes an entry and returns its transaction hash.
    fn publish(&self, entry: &LogEntry) -> Result<String, PublishError>;
}

/// A published entry together with its transaction hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedLog {
    /// Simulated transaction hash.
    pub tx_hash: String,
    /// The entry as published.
    pub entry: LogEntry,
}

/// Result of [`SimulatedChainPublisher::verify_log_integrity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogIntegrity {
    /// Number of entries inspected.
    pub total_entries: usize,
    /// Entries carrying timestamp, agent and event.
    pub valid_entries: usize,
    /// Whether every entry is valid.
    pub intact: bool,
}

/// In-memory chain stub.
///
/// Transaction hashes are `0xSIMULATED` followed by the last six characters
/// of the entry timestamp.
#[derive(Debug, Default)]
pub struct SimulatedChainPublisher {
    published: RwLock<Vec<PublishedLog>>,
}

impl SimulatedChainPublisher {
    /// Creates an empty publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns published entries, optionally only those from `agent`.
    #[must_use]
    pub fn contract_logs(&self, agent: Option<&str>) -> Vec<LogEntry> {
        self.published
            .read()
            .iter()
            .filter(|p| agent.map_or(true, |a| p.entry.agent == a))
            .map(|p| p.entry.clone())
            .collect()
    }

    /// Returns every published entry with its hash.
    #[must_use]
    pub fn published(&self) -> Vec<PublishedLog> {
        self.published.read().clone()
    }

    /// Checks that every published entry has the required fields.
    #[must_use]
    pub fn verify_log_integrity(&self) -> LogIntegrity {
        let published = self.published.read();
        let valid_entries = published
            .iter()
            .filter(|p| {
                !p.entry.timestamp.is_empty()
                    && !p.entry.agent.is_empty()
                    && !p.entry.event.is_empty()
            })
            .count();
        LogIntegrity {
            total_entries: published.len(),
            valid_entries,
            intact: valid_entries == published.len(),
        }
    }
}

fn simulated_hash(timestamp: &str) -> String {
    let tail: String = {
        let chars: Vec<char> = timestamp.chars().collect();
        let start = chars.len().saturating_sub(6);
        chars[start..].iter().collect()
    };
    format!("0xSIMULATED{tail}")
}

impl ChainPublisher for SimulatedChainPublisher {
    fn publish(&self, entry: &LogEntry) -> Result<String, PublishError> {
        let tx_hash = simulated_hash(&entry.timestamp);
        self.published.write().push(PublishedLog {
            tx_hash: tx_hash.clone(),
            entry: entry.clone(),
        });
        Ok(tx_hash)
    }
}
