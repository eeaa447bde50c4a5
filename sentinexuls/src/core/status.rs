//! Stage phase and simulation status enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle phase reported in stage log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StagePhase {
    /// The stage is about to run.
    Started,
    /// The stage returned a record.
    Completed,
    /// The stage returned an error or panicked.
    Failed,
}

impl StagePhase {
    /// Returns the human-readable event description used in log entries.
    #[must_use]
    pub fn event_description(self) -> &'static str {
        match self {
            Self::Started => "Agent started",
            Self::Completed => "Agent completed",
            Self::Failed => "Agent error",
        }
    }
}

impl fmt::Display for StagePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => write!(f, "started"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome of a breach simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SimulationStatus {
    /// The breach was reproduced against at least one vulnerability.
    Success,
    /// Nothing was tested, so no verdict is possible.
    Inconclusive,
}

impl SimulationStatus {
    /// Returns the wire representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Inconclusive => "INCONCLUSIVE",
        }
    }
}

impl fmt::Display for SimulationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
