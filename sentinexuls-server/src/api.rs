//! HTTP API.
//!
//! All dashboard routes live under `/api/v1`; `/` and `/health` sit at the
//! root. Request bodies that fail to parse are answered with an
//! `{"error", "message", "status": "error"}` envelope.

use crate::config::ServerConfig;
use crate::mock_data;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use sentinexuls::context::{
    ConfigProvider, ContextProvider, InMemoryConfigStore, VaultIdentity, VaultPatch,
    CAP_DID_AUDITS, CAP_TOKEN_AUTH,
};
use sentinexuls::core::{Record, RecordExt};
use sentinexuls::did::DidResolver;
use sentinexuls::errors::PipelineValidationError;
use sentinexuls::events::{EventLogger, JsonlEventLogger, SimulatedChainPublisher};
use sentinexuls::pipeline::{standard_graph_with, PipelineExecutor, PipelineResult, StandardStages};
use sentinexuls::simulation::{vulnerability_count, BreachSimulator, ScenarioType};
use sentinexuls::utils::{format_iso, iso_timestamp, now_utc, stamped_id};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// API version reported by the status endpoints.
pub const API_VERSION: &str = "1.0.0";

const API_SOURCE: &str = "API";

/// Shared handler state.
pub struct AppState {
    /// Runs the standard pipeline.
    pub executor: PipelineExecutor,
    /// The vault identity store behind the executor's context provider.
    pub store: Arc<InMemoryConfigStore>,
    /// Simulator shared by the `sim` stage and `/simulate`.
    pub simulator: Arc<BreachSimulator>,
    /// Event logger shared by the executor and the handlers.
    pub logger: Arc<dyn EventLogger>,
}

impl AppState {
    /// Wires the standard pipeline around `store` and `logger`.
    pub fn new(
        store: Arc<InMemoryConfigStore>,
        logger: Arc<dyn EventLogger>,
        seed: Option<u64>,
    ) -> Result<Self, PipelineValidationError> {
        let simulator = Arc::new(BreachSimulator::seeded(seed).with_logger(logger.clone()));
        let graph = standard_graph_with(StandardStages::with_simulator(simulator.clone()))?;
        let provider = ContextProvider::new(store.clone())
            .with_resolver(Arc::new(DidResolver::default()));
        let executor = PipelineExecutor::new(Arc::new(graph), Arc::new(provider))
            .with_logger(logger.clone());

        Ok(Self {
            executor,
            store,
            simulator,
            logger,
        })
    }

    /// Builds the state from configuration and initializes the vault store.
    pub fn from_config(config: &ServerConfig) -> Result<Self, PipelineValidationError> {
        let store = Arc::new(InMemoryConfigStore::new(config.vault_identity()));
        let startup = store.initialize();
        tracing::info!(
            vault_id = %startup.vault_id,
            capabilities = startup.capabilities_count,
            security_level = %startup.security_level,
            "Vault initialized"
        );

        let mut logger = JsonlEventLogger::new(&config.logging.event_log_path);
        if config.logging.on_chain {
            logger = logger.with_publisher(Arc::new(SimulatedChainPublisher::new()));
        }

        Self::new(store, Arc::new(logger), config.simulation.seed)
    }

    fn log(&self, event: &str, data: &Value) {
        self.logger.log_event(API_SOURCE, event, Some(data), false);
    }
}

/// Error response for rejected requests.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.status.canonical_reason().unwrap_or("Request error"),
            "message": self.message,
            "status": "error",
        });
        (self.status, Json(body)).into_response()
    }
}

/// Builds the application router.
pub fn router(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let api = Router::new()
        .route("/dashboard", get(dashboard))
        .route("/intel-feed", get(intel_feed))
        .route("/simulate", post(simulate))
        .route("/agents", get(agents))
        .route("/alerts", get(alerts))
        .route("/vault-settings", get(get_vault_settings).put(update_vault_settings))
        .route("/system/status", get(system_status))
        .route("/pipeline/execute", post(execute_pipeline));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "SentiNexuls API is operational",
        "version": API_VERSION,
        "status": "active",
        "endpoints": {
            "dashboard": "/api/v1/dashboard",
            "intel_feed": "/api/v1/intel-feed",
            "simulate": "/api/v1/simulate",
            "agents": "/api/v1/agents",
            "alerts": "/api/v1/alerts",
            "vault_settings": "/api/v1/vault-settings",
            "pipeline": "/api/v1/pipeline/execute"
        }
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "SentiNexuls API",
        "timestamp": iso_timestamp(),
    }))
}

async fn dashboard(State(state): State<Arc<AppState>>) -> Json<Value> {
    let vault = state.store.get();
    let agent_data = mock_data::agent_status();
    let agents = agent_data["agents"].as_array().cloned().unwrap_or_default();
    let active = agents.iter().filter(|a| a["status"] == "ACTIVE").count();
    let enhanced = agents.iter().filter(|a| a["vault_enhanced"] == true).count();

    let body = json!({
        "enico_status": {
            "status": vault.enico_status,
            "vault_id": vault.vault_id,
            "dev_eon_linked": vault.dev_eon_linked,
            "web4_compliance": vault.web4_compliance,
            "last_update": iso_timestamp(),
            "autonomous_mode": vault.autonomous_mode
        },
        "agent_overview": {
            "total_agents": agents.len(),
            "active_agents": active,
            "system_health": agent_data["system_health"]["overall_status"],
            "vault_enhanced_agents": enhanced,
            "pipeline_throughput": agent_data["system_health"]["pipeline_throughput"]
        },
        "threat_summary": {
            "active_threats": 5,
            "critical_alerts": 3,
            "simulations_today": 8,
            "last_breach_simulation": "2025-06-05T09:13:20Z"
        },
        "system_metrics": {
            "uptime": agent_data["system_health"]["system_uptime"],
            "success_rate": agent_data["performance_metrics"]["success_rate_overall"],
            "executions_today": agent_data["performance_metrics"]["total_executions_today"],
            "average_response_time": "4.2 seconds"
        }
    });

    state.log("Dashboard data requested", &json!({"endpoint": "/dashboard"}));
    Json(body)
}

async fn intel_feed(State(state): State<Arc<AppState>>) -> Json<Value> {
    let feed = mock_data::intel_feed(&iso_timestamp());
    state.log(
        "Intel feed requested",
        &json!({"endpoint": "/intel-feed", "total_threats": feed["total_threats"]}),
    );
    Json(feed)
}

async fn agents(State(state): State<Arc<AppState>>) -> Json<Value> {
    let data = mock_data::agent_status();
    state.log(
        "Agent status requested",
        &json!({"endpoint": "/agents", "active_agents": data["system_health"]["active_agents"]}),
    );
    Json(data)
}

async fn alerts(State(state): State<Arc<AppState>>) -> Json<Value> {
    let data = mock_data::alerts();
    let stats = &data["alert_statistics"];
    state.log(
        "Alerts requested",
        &json!({
            "endpoint": "/alerts",
            "total_alerts": stats["total_alerts_today"],
            "active_alerts": stats["active_alerts"]
        }),
    );
    Json(data)
}

/// Body of `POST /simulate`.
#[derive(Debug, Deserialize)]
pub struct SimulationRequest {
    /// Vulnerability report to simulate against.
    pub vuln_data: Record,
    /// Target description (`region`, `substation_ids`, ...).
    pub target_metadata: Record,
    /// `standard`, `advanced` or `stress_test`; anything else runs a basic simulation.
    #[serde(default)]
    pub scenario_type: Option<String>,
    /// Run every scenario and consolidate the results.
    #[serde(default)]
    pub run_full_suite: Option<bool>,
}

async fn simulate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SimulationRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    let now = now_utc();
    let simulation_id = stamped_id("SIM", &now);
    let scenario_name = request.scenario_type.as_deref().unwrap_or("standard");
    let full_suite = request.run_full_suite.unwrap_or(false);

    state.log(
        "Simulation requested",
        &json!({
            "simulation_id": simulation_id,
            "scenario_type": scenario_name,
            "full_suite": full_suite
        }),
    );

    let scenario = ScenarioType::from_name(scenario_name);
    let (results, simulation_type) = if full_suite {
        let results = state
            .simulator
            .run_scenario_suite(&request.vuln_data, &request.target_metadata)
            .await;
        (results, "comprehensive_suite".to_string())
    } else if let Some(scenario) = scenario {
        let results = state
            .simulator
            .run_advanced_simulation(&request.vuln_data, &request.target_metadata, scenario)
            .await;
        (results, format!("advanced_{scenario}"))
    } else {
        let results = state
            .simulator
            .simulate_breach(&request.vuln_data, &request.target_metadata);
        (results, "basic".to_string())
    };

    let duration = results.f64_or("simulation_duration_sec", 0.0);
    state.log(
        "Simulation completed",
        &json!({
            "simulation_id": simulation_id,
            "status": results.str_or("status", "UNKNOWN"),
            "duration": duration
        }),
    );

    Ok(Json(json!({
        "status": "SUCCESS",
        "simulation_id": simulation_id,
        "simulation_type": simulation_type,
        "results": results,
        "timestamp": format_iso(&now),
        "metadata": {
            "vuln_count": vulnerability_count(&request.vuln_data),
            "target_region": request.target_metadata.str_or("region", "Unknown"),
            "execution_time": duration
        }
    })))
}

/// Renders the vault settings view of `vault`.
pub fn vault_settings(vault: &VaultIdentity) -> Value {
    let now = iso_timestamp();
    json!({
        "vault_info": {
            "vault_id": vault.vault_id,
            "vault_did": vault.vault_did,
            "project_token": vault.project_token,
            "vault_version": vault.vault_version,
            "origin_chain": vault.origin_chain
        },
        "status": {
            "enico_status": vault.enico_status,
            "dev_eon_linked": vault.dev_eon_linked,
            "web4_compliance": vault.web4_compliance,
            "vault_active": vault.is_active(),
            "autonomous_mode": vault.autonomous_mode,
            "security_level": vault.security_level
        },
        "capabilities": {
            "available_capabilities": vault.vault_capabilities,
            "total_capabilities": vault.vault_capabilities.len(),
            "last_capability_update": vault.last_capability_update,
            "evolution_stage": vault.evolution_stage()
        },
        "token_status": {
            "token_symbol": vault.project_token,
            "auth_infrastructure": vault.has_capability(CAP_TOKEN_AUTH),
            "did_authenticated_audits": vault.has_capability(CAP_DID_AUDITS),
            "last_auth_check": now
        },
        "integration_status": {
            "vault_initialization": vault.initialization_timestamp,
            "services_connected": [
                "SentiNexuls Platform",
                "EONIC Vault",
                "DEV-EON Network",
                "Web4 Dashboard"
            ],
            "api_endpoints_active": 6,
            "last_health_check": now
        }
    })
}

async fn get_vault_settings(State(state): State<Arc<AppState>>) -> Json<Value> {
    let vault = state.store.get();
    state.log(
        "Vault settings requested",
        &json!({
            "endpoint": "/vault-settings",
            "vault_id": vault.vault_id,
            "vault_active": vault.is_active()
        }),
    );
    Json(vault_settings(&vault))
}

async fn update_vault_settings(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VaultPatch>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(patch) = payload?;
    let vault = state.store.update(patch);
    state.log(
        "Vault settings updated",
        &json!({
            "vault_id": vault.vault_id,
            "total_capabilities": vault.vault_capabilities.len()
        }),
    );
    Ok(Json(vault_settings(&vault)))
}

async fn system_status(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "api_version": API_VERSION,
        "system_time": iso_timestamp(),
        "vault_integration": state.store.get().is_active(),
        "available_endpoints": [
            "/dashboard",
            "/intel-feed",
            "/simulate",
            "/agents",
            "/alerts",
            "/vault-settings",
            "/system/status",
            "/pipeline/execute"
        ],
        "pipeline": {
            "name": state.executor.graph().name(),
            "stages": state.executor.graph().execution_order()
        },
        "system_health": "OPERATIONAL"
    }))
}

async fn execute_pipeline(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Record>, JsonRejection>,
) -> Result<(StatusCode, Json<PipelineResult>), ApiError> {
    let Json(input) = payload?;
    state.log(
        "Pipeline execution requested",
        &json!({"endpoint": "/pipeline/execute"}),
    );

    let result = state.executor.run_pipeline(input).await;
    let status = if result.is_success() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    state.log(
        "Pipeline execution completed",
        &json!({"status": if result.is_success() { "SUCCESS" } else { "ERROR" }}),
    );
    Ok((status, Json(result)))
}
