//! Core value types shared by every stage.
//!
//! - The open [`Record`] payload with default-providing accessors
//! - Stage phase and simulation status enums

mod record;
#[cfg(test)]
mod record_tests;
mod status;

pub use record::{record_from, Record, RecordExt};
pub use status::{SimulationStatus, StagePhase};
