//! # SentiNexuls server
//!
//! HTTP API and command-line front end for the [`sentinexuls`] pipeline.
//!
//! - [`config`]: YAML configuration with discovery and environment overrides
//! - [`api`]: the axum router and its shared state
//! - [`commands`]: one-shot pipeline runs that write reports

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod api;
pub mod commands;
pub mod config;
pub mod mock_data;

use anyhow::{Context, Result};
use config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Initializes the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .context("Failed to create log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);

    if config.json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
    Ok(())
}
