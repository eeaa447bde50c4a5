//! Breach simulation.
//!
//! The simulation stage runs a basic [`BreachSimulator::simulate_breach`];
//! the HTTP layer also exposes the per-scenario and full-suite variants.

mod scenario;

pub use scenario::{
    generate_recommendations, vulnerability_count, BreachSimulator, ScenarioType,
    SimulationMetrics,
};
