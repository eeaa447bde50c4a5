//! Server configuration.
//!
//! Configuration is YAML. The file is located in this order:
//!
//! 1. the `--config` flag (a missing or invalid file is an error)
//! 2. `SENTINEXULS_CONFIG_PATH`
//! 3. `./sentinexuls.yaml`
//!
//! With no file the built-in defaults are used. `SENTINEXULS_HOST`,
//! `SENTINEXULS_PORT`, `SENTINEXULS_LOG_LEVEL` and `SENTINEXULS_LOG_FILE`
//! override the loaded values.

use sentinexuls::context::VaultIdentity;
use sentinexuls::events::DEFAULT_LOG_PATH;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming a config file.
pub const CONFIG_PATH_ENV: &str = "SENTINEXULS_CONFIG_PATH";
/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "sentinexuls.yaml";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config at {path}: {source}")]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid configuration YAML.
    #[error("Failed to parse config at {path}: {source}")]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_yaml::Error,
    },
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Origins allowed by CORS.
    pub cors_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        let origins = ["localhost", "127.0.0.1"]
            .iter()
            .flat_map(|host| {
                ["3000", "5173", "8080"]
                    .iter()
                    .map(move |port| format!("http://{host}:{port}"))
            })
            .collect();

        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: origins,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter; `RUST_LOG` wins when set.
    pub level: String,
    /// Emit JSON instead of compact text.
    pub json: bool,
    /// Where agent events are appended as JSON lines.
    pub event_log_path: PathBuf,
    /// Forward persisted events to the simulated chain publisher.
    pub on_chain: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            event_log_path: PathBuf::from(DEFAULT_LOG_PATH),
            on_chain: false,
        }
    }
}

/// Breach simulation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP listener.
    pub server: HttpConfig,
    /// Logging.
    pub logging: LoggingConfig,
    /// Vault identity seeding the config store. Defaults when absent.
    pub vault: Option<VaultIdentity>,
    /// Simulation.
    pub simulation: SimulationConfig,
}

impl ServerConfig {
    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Finds a config file from the environment or the working directory.
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from(DEFAULT_CONFIG_FILE);
        cwd.exists().then_some(cwd)
    }

    /// Loads the explicit file, else a discovered one, else the defaults,
    /// then applies environment overrides.
    pub fn load_or_default(cli_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match cli_path.or_else(Self::discover_config) {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading configuration");
                Self::from_yaml_file(&path)?
            }
            None => {
                tracing::info!("No configuration file found, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Applies `SENTINEXULS_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies overrides from `lookup`. Unparseable values are ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("SENTINEXULS_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SENTINEXULS_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => {
                    tracing::warn!(value = %port, "Invalid SENTINEXULS_PORT, ignoring");
                }
            }
        }
        if let Some(level) = lookup("SENTINEXULS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(path) = lookup("SENTINEXULS_LOG_FILE") {
            self.logging.event_log_path = PathBuf::from(path);
        }
    }

    /// `host:port` for the listener.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// The configured vault identity, or the built-in one.
    #[must_use]
    pub fn vault_identity(&self) -> VaultIdentity {
        self.vault.clone().unwrap_or_default()
    }
}
