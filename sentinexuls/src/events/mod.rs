//! Event logging for agents and pipeline runs.
//!
//! Every stage transition is reported to an [`EventLogger`]. The default
//! [`JsonlEventLogger`] writes to the console and to a JSON-lines file, and
//! forwards entries flagged for external persistence to a
//! [`ChainPublisher`].

mod chain;
mod logger;

pub use chain::{ChainPublisher, LogIntegrity, PublishedLog, SimulatedChainPublisher};
pub use logger::{
    log_agent_complete, log_agent_error, log_agent_start, log_pipeline_event,
    CollectingEventLogger, EventLogger, JsonlEventLogger, LogEntry, NoOpEventLogger,
    DEFAULT_LOG_PATH,
};
