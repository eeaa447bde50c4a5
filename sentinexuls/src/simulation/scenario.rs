//! Breach scenarios and their metrics.

use crate::core::{Record, RecordExt, SimulationStatus};
use crate::events::{EventLogger, NoOpEventLogger};
use crate::utils::iso_timestamp;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

const SIM_AGENT: &str = "SimAgent";
const MAX_SIMULATED_DELAY: f64 = 0.5;

/// The breach scenario templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioType {
    /// Baseline scenario.
    #[default]
    Standard,
    /// Higher complexity, slower detection.
    Advanced,
    /// Highest complexity.
    StressTest,
}

impl ScenarioType {
    /// All scenarios, in suite order.
    pub const ALL: [Self; 3] = [Self::Standard, Self::Advanced, Self::StressTest];

    /// Parses a wire name. Unknown names are `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }

    /// Returns the wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Advanced => "advanced",
            Self::StressTest => "stress_test",
        }
    }

    /// Complexity multiplier reported in the metrics.
    #[must_use]
    pub fn complexity(self) -> f64 {
        match self {
            Self::Standard => 1.0,
            Self::Advanced => 1.5,
            Self::StressTest => 2.0,
        }
    }

    /// Upper bound of the detection time draw, in seconds.
    #[must_use]
    pub fn detection_delay(self) -> f64 {
        match self {
            Self::Standard => 2.0,
            Self::Advanced => 4.0,
            Self::StressTest => 8.0,
        }
    }
}

impl fmt::Display for ScenarioType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metrics of one advanced scenario run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationMetrics {
    /// Drawn from `[1.0, detection_delay]`.
    pub time_to_detection_sec: f64,
    /// Number of vulnerabilities exercised.
    pub attack_vectors_tested: usize,
    /// Drawn from `[1, number of substations]`.
    pub systems_compromised: usize,
    /// Drawn from `[0.70, 0.95]`.
    pub mitigation_effectiveness: f64,
    /// See [`ScenarioType::complexity`].
    pub scenario_complexity: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Number of vulnerabilities in a vulnerability stage output.
///
/// A missing list counts as none; a present non-list value counts as one.
#[must_use]
pub fn vulnerability_count(vuln_data: &Record) -> usize {
    match vuln_data.get("vulnerabilities") {
        None | Some(Value::Null) => 0,
        Some(Value::Array(items)) => items.len(),
        Some(_) => 1,
    }
}

/// Derives recommendations from scenario metrics and target data.
#[must_use]
pub fn generate_recommendations(
    metrics: &SimulationMetrics,
    vuln_data: &Record,
    metadata: &Record,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if metrics.time_to_detection_sec > 5.0 {
        recommendations.push(
            "Consider implementing real-time monitoring for faster threat detection".to_string(),
        );
    }
    if metrics.mitigation_effectiveness < 0.8 {
        recommendations.push("Review and strengthen incident response procedures".to_string());
    }
    if metadata.str_or("region", "").contains("Florida") {
        recommendations.push(
            "Implement hurricane-resilient backup systems for critical infrastructure".to_string(),
        );
    }
    if Value::Object(vuln_data.clone()).to_string().to_lowercase().contains("firmware") {
        recommendations.push("Establish automated firmware update procedures".to_string());
    }
    if recommendations.is_empty() {
        recommendations
            .push("Current security posture appears adequate based on simulation".to_string());
    }

    recommendations
}

/// Runs breach simulations against vulnerability data.
///
/// Metric draws come from one RNG, seedable for reproducible runs.
pub struct BreachSimulator {
    rng: Mutex<StdRng>,
    logger: Arc<dyn EventLogger>,
}

impl fmt::Debug for BreachSimulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BreachSimulator").finish_non_exhaustive()
    }
}

impl Default for BreachSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl BreachSimulator {
    /// Creates a simulator seeded from the OS.
    #[must_use]
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Creates a simulator with a fixed seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    /// Creates a simulator with an optional seed.
    #[must_use]
    pub fn seeded(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::with_seed)
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            logger: Arc::new(NoOpEventLogger),
        }
    }

    /// Sets the event logger.
    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn EventLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Runs one basic simulation.
    ///
    /// `metadata` is the target infrastructure description (`region`,
    /// `substation_ids`).
    pub fn simulate_breach(&self, vuln_data: &Record, metadata: &Record) -> Record {
        let count = vulnerability_count(vuln_data);
        self.logger.log_event(
            SIM_AGENT,
            "Starting breach simulation",
            Some(&json!({
                "target_region": metadata.str_or("region", "Unknown"),
                "vulnerability_count": count,
            })),
            false,
        );

        let started = Instant::now();
        let (detection, mitigation) = {
            let mut rng = self.rng.lock();
            (
                round2(rng.gen_range(1.0..=2.0)),
                round2(rng.gen_range(0.70..=0.95)),
            )
        };
        let status = if count > 0 {
            SimulationStatus::Success
        } else {
            SimulationStatus::Inconclusive
        };
        let summary = match status {
            SimulationStatus::Success => format!("Breach validated. Response time: {detection}s"),
            SimulationStatus::Inconclusive => "No vulnerabilities to test.".to_string(),
        };

        let mut result = Record::new();
        result.insert("simulation_result".into(), json!(summary));
        result.insert("status".into(), json!(status));
        result.insert("time_to_detection_sec".into(), json!(detection));
        result.insert("mitigation_effectiveness".into(), json!(mitigation));
        result.insert(
            "simulation_duration_sec".into(),
            json!(round2(started.elapsed().as_secs_f64())),
        );
        result.insert("simulation_timestamp".into(), json!(iso_timestamp()));
        result.insert(
            "input_summary".into(),
            json!({
                "vulnerabilities_tested": vuln_data,
                "target_infrastructure": metadata,
            }),
        );

        self.logger.log_event(
            SIM_AGENT,
            "Simulation completed",
            Some(&json!({ "status": status, "time_to_detection_sec": detection })),
            false,
        );
        result
    }

    /// Runs one scenario with scenario-specific metrics and recommendations.
    ///
    /// Sleeps for the detection time, capped at half a second.
    pub async fn run_advanced_simulation(
        &self,
        vuln_data: &Record,
        metadata: &Record,
        scenario: ScenarioType,
    ) -> Record {
        self.logger.log_event(
            SIM_AGENT,
            &format!("Starting {scenario} simulation scenario"),
            None,
            false,
        );
        let started = Instant::now();

        let substations = metadata.array_or("substation_ids", vec![json!("default")]).len().max(1);
        let (detection, compromised, mitigation) = {
            let mut rng = self.rng.lock();
            (
                rng.gen_range(1.0..=scenario.detection_delay()),
                rng.gen_range(1..=substations),
                round2(rng.gen_range(0.70..=0.95)),
            )
        };
        tokio::time::sleep(Duration::from_secs_f64(detection.min(MAX_SIMULATED_DELAY))).await;

        let metrics = SimulationMetrics {
            time_to_detection_sec: round2(detection),
            attack_vectors_tested: vulnerability_count(vuln_data),
            systems_compromised: compromised,
            mitigation_effectiveness: mitigation,
            scenario_complexity: scenario.complexity(),
        };

        let mut result = self.simulate_breach(vuln_data, metadata);
        result.insert("scenario_type".into(), json!(scenario));
        result.insert("simulation_metrics".into(), json!(metrics));
        result.insert(
            "recommendations".into(),
            json!(generate_recommendations(&metrics, vuln_data, metadata)),
        );
        let total = round2(started.elapsed().as_secs_f64());
        result.insert("total_simulation_duration_sec".into(), json!(total));

        self.logger.log_event(
            SIM_AGENT,
            &format!("Advanced {scenario} simulation completed"),
            Some(&json!({ "duration": total, "metrics": metrics })),
            false,
        );
        result
    }

    /// Runs every scenario and consolidates the results.
    pub async fn run_scenario_suite(&self, vuln_data: &Record, metadata: &Record) -> Record {
        self.logger.log_event(SIM_AGENT, "Starting comprehensive scenario suite", None, false);

        let mut scenario_results = Record::new();
        let mut total_duration = 0.0;
        let mut detection_sum = 0.0;
        let mut consolidated: Vec<String> = Vec::new();

        for scenario in ScenarioType::ALL {
            let result = self.run_advanced_simulation(vuln_data, metadata, scenario).await;
            total_duration += result.f64_or("total_simulation_duration_sec", 0.0);
            detection_sum += result
                .object_or_empty("simulation_metrics")
                .f64_or("time_to_detection_sec", 0.0);
            for rec in result.strings_or("recommendations", &[]) {
                if !consolidated.contains(&rec) {
                    consolidated.push(rec);
                }
            }
            scenario_results.insert(scenario.as_str().into(), Value::Object(result));
        }

        #[allow(clippy::cast_precision_loss)]
        let scenario_count = ScenarioType::ALL.len() as f64;
        let summary = json!({
            "scenarios_executed": ScenarioType::ALL.len(),
            "total_duration": round2(total_duration),
            "average_detection_time": round2(detection_sum / scenario_count),
            "overall_status": "COMPREHENSIVE_ANALYSIS_COMPLETE",
        });

        self.logger.log_event(SIM_AGENT, "Scenario suite completed", Some(&summary), false);

        let mut suite = Record::new();
        suite.insert("suite_summary".into(), summary);
        suite.insert("scenario_results".into(), Value::Object(scenario_results));
        suite.insert("consolidated_recommendations".into(), json!(consolidated));
        suite
    }
}
