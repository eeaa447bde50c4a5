//! Event logger trait and implementations.

use super::ChainPublisher;
use crate::core::StagePhase;
use crate::utils::iso_timestamp;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default location of the JSONL event log.
pub const DEFAULT_LOG_PATH: &str = "logs/agent_log.jsonl";

/// One logged event, as written to the JSONL file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// When the event was logged.
    pub timestamp: String,
    /// The source that produced the event (agent or subsystem name).
    pub agent: String,
    /// What happened.
    pub event: String,
    /// Additional structured data, `{}` when none.
    pub data: Value,
}

impl LogEntry {
    /// Creates an entry stamped with the current time.
    #[must_use]
    pub fn new(agent: &str, event: &str, data: Option<&Value>) -> Self {
        Self {
            timestamp: iso_timestamp(),
            agent: agent.to_string(),
            event: event.to_string(),
            data: data.cloned().unwrap_or_else(|| Value::Object(serde_json::Map::new())),
        }
    }
}

/// Sink for pipeline and agent events.
///
/// Logging is best-effort: implementations must never panic or return an
/// error to the caller. Failures are reported on the console only.
pub trait EventLogger: Send + Sync {
    /// Logs an event.
    ///
    /// # Arguments
    ///
    /// * `source` - Name of the agent or subsystem
    /// * `event` - Event description
    /// * `data` - Optional structured data
    /// * `persist_externally` - Also forward the entry to the chain publisher
    fn log_event(&self, source: &str, event: &str, data: Option<&Value>, persist_externally: bool);
}

/// Logs that an agent started processing.
pub fn log_agent_start(logger: &dyn EventLogger, agent: &str, input: &Value) {
    let phase = StagePhase::Started;
    logger.log_event(
        agent,
        phase.event_description(),
        Some(&serde_json::json!({ "phase": phase, "input": input })),
        false,
    );
}

/// Logs that an agent completed processing.
pub fn log_agent_complete(
    logger: &dyn EventLogger,
    agent: &str,
    output: &Value,
    execution_time: Option<f64>,
) {
    let phase = StagePhase::Completed;
    let mut data = serde_json::json!({ "phase": phase, "output": output });
    if let Some(seconds) = execution_time {
        data["execution_time_seconds"] = serde_json::json!(seconds);
    }
    logger.log_event(agent, phase.event_description(), Some(&data), false);
}

/// Logs an agent error. Errors are always persisted externally.
pub fn log_agent_error(logger: &dyn EventLogger, agent: &str, error: &str, input: Option<&Value>) {
    let phase = StagePhase::Failed;
    let data = serde_json::json!({ "phase": phase, "error": error, "input": input });
    logger.log_event(agent, phase.event_description(), Some(&data), true);
}

/// Logs a pipeline-level event.
pub fn log_pipeline_event(
    logger: &dyn EventLogger,
    event: &str,
    data: Option<&Value>,
    persist: bool,
) {
    logger.log_event("Pipeline", event, data, persist);
}

/// A logger that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventLogger;

impl EventLogger for NoOpEventLogger {
    fn log_event(&self, _source: &str, _event: &str, _data: Option<&Value>, _persist: bool) {
        // Intentionally empty - discards all events
    }
}

/// Console + JSONL file logger with optional chain publishing.
///
/// Every entry goes to `tracing` and is appended as one JSON line to the log
/// file. Entries flagged for external persistence are forwarded to the chain
/// publisher when one is configured.
pub struct JsonlEventLogger {
    path: PathBuf,
    publisher: Option<Arc<dyn ChainPublisher>>,
    missing_publisher_reported: AtomicBool,
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for JsonlEventLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonlEventLogger")
            .field("path", &self.path)
            .field("publisher", &self.publisher.is_some())
            .finish()
    }
}

impl Default for JsonlEventLogger {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_PATH)
    }
}

impl JsonlEventLogger {
    /// Creates a logger appending to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            publisher: None,
            missing_publisher_reported: AtomicBool::new(false),
            write_lock: Mutex::new(()),
        }
    }

    /// Sets the chain publisher used for persisted entries.
    #[must_use]
    pub fn with_publisher(mut self, publisher: Arc<dyn ChainPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Returns the log file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, entry: &LogEntry) -> std::io::Result<()> {
        let line = serde_json::to_string(entry)?;
        let _guard = self.write_lock.lock();
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{line}")
    }

    fn publish(&self, entry: &LogEntry) {
        match &self.publisher {
            Some(publisher) => match publisher.publish(entry) {
                Ok(tx) => info!(tx = %tx, "Log entry published to chain"),
                Err(e) => warn!(error = %e, "Failed to publish log entry to chain"),
            },
            None => {
                if !self.missing_publisher_reported.swap(true, Ordering::Relaxed) {
                    warn!("No chain publisher configured; skipping on-chain logging");
                }
            }
        }
    }
}

impl EventLogger for JsonlEventLogger {
    fn log_event(&self, source: &str, event: &str, data: Option<&Value>, persist_externally: bool) {
        let entry = LogEntry::new(source, event, data);

        info!(agent = %entry.agent, event = %entry.event, "{} :: {}", entry.agent, entry.event);
        if data.is_some() {
            debug!(agent = %entry.agent, data = %entry.data, "event data");
        }

        if let Err(e) = self.append(&entry) {
            warn!(path = %self.path.display(), error = %e, "Failed to write to log file");
        }

        if persist_externally {
            self.publish(&entry);
        }
    }
}

/// A collecting logger for testing purposes.
#[derive(Debug, Default)]
pub struct CollectingEventLogger {
    entries: Mutex<Vec<(LogEntry, bool)>>,
}

impl CollectingEventLogger {
    /// Creates a new collecting logger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected entries.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().iter().map(|(e, _)| e.clone()).collect()
    }

    /// Returns the entries that were flagged for external persistence.
    #[must_use]
    pub fn persisted(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|(_, persist)| *persist)
            .map(|(e, _)| e.clone())
            .collect()
    }

    /// Returns entries from one source.
    #[must_use]
    pub fn from_source(&self, source: &str) -> Vec<LogEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|(e, _)| e.agent == source)
            .map(|(e, _)| e.clone())
            .collect()
    }

    /// Returns the number of collected entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if nothing was logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl EventLogger for CollectingEventLogger {
    fn log_event(&self, source: &str, event: &str, data: Option<&Value>, persist_externally: bool) {
        self.entries
            .lock()
            .push((LogEntry::new(source, event, data), persist_externally));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::SimulatedChainPublisher;
    use serde_json::json;

    fn read_lines(path: &Path) -> Vec<LogEntry> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_log_entry_defaults_data() {
        let entry = LogEntry::new("Pipeline", "Started", None);
        assert_eq!(entry.data, json!({}));
    }

    #[test]
    fn test_noop_logger() {
        NoOpEventLogger.log_event("x", "y", Some(&json!({"k": 1})), true);
        // Should not panic
    }

    #[test]
    fn test_jsonl_logger_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("agent_log.jsonl");
        let logger = JsonlEventLogger::new(&path);

        logger.log_event("IntelSweepAgent", "Scan complete", Some(&json!({"threats": 3})), false);
        logger.log_event("Pipeline", "Done", None, false);

        let entries = read_lines(&path);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].agent, "IntelSweepAgent");
        assert_eq!(entries[0].data, json!({"threats": 3}));
        assert_eq!(entries[1].event, "Done");
    }

    #[test]
    fn test_jsonl_logger_survives_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending.
        let logger = JsonlEventLogger::new(dir.path());
        logger.log_event("Pipeline", "Started", None, true);
        // Should not panic
    }

    #[test]
    fn test_jsonl_logger_publishes_persisted_entries() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = Arc::new(SimulatedChainPublisher::new());
        let logger =
            JsonlEventLogger::new(dir.path().join("log.jsonl")).with_publisher(publisher.clone());

        logger.log_event("Pipeline", "Not persisted", None, false);
        logger.log_event("Pipeline", "Persisted", None, true);

        let published = publisher.contract_logs(None);
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].event, "Persisted");
    }

    #[test]
    fn test_collecting_logger() {
        let logger = CollectingEventLogger::new();
        assert!(logger.is_empty());

        log_agent_start(&logger, "VulnDetectAgent", &json!({"intel": "x"}));
        log_agent_complete(&logger, "VulnDetectAgent", &json!({}), Some(1.5));
        log_agent_error(&logger, "AlertAgent", "boom", None);
        log_pipeline_event(&logger, "Pipeline completed", None, false);

        assert_eq!(logger.len(), 4);
        assert_eq!(logger.from_source("VulnDetectAgent").len(), 2);
        let persisted = logger.persisted();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].event, "Agent error");
        assert_eq!(persisted[0].data["error"], "boom");
        assert_eq!(persisted[0].data["phase"], "failed");
        assert_eq!(logger.entries()[0].data["phase"], "started");
        assert_eq!(logger.entries()[1].data["execution_time_seconds"], 1.5);
    }
}
