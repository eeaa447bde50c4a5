//! `sentinexuls` binary: serve the API, run the pipeline once, or print
//! the vault settings.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sentinexuls_server::api::{router, AppState};
use sentinexuls_server::commands;
use sentinexuls_server::config::ServerConfig;
use sentinexuls_server::init_logging;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

/// SentiNexuls threat simulation platform
#[derive(Parser)]
#[command(name = "sentinexuls")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "SENTINEXULS_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API (default)
    Serve,

    /// Run the agent pipeline once and write reports
    Run {
        /// Input JSON file
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Directory for the generated reports
        #[arg(long, value_name = "DIR", default_value = "outputs")]
        report_dir: PathBuf,
    },

    /// Print the vault settings
    Vault,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ServerConfig::load_or_default(cli.config).context("Failed to load configuration")?;
    init_logging(&config.logging)?;

    let state = AppState::from_config(&config).context("Failed to build pipeline")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&config, state).await,
        Commands::Run { input, report_dir } => {
            let summary = commands::run_once(&state, input.as_deref(), &report_dir).await?;
            println!("Report generated: {}", summary.markdown.display());
            println!("HTML report generated: {}", summary.html.display());
            if let Some(error) = summary.result.error() {
                anyhow::bail!("Pipeline execution completed with errors: {error}");
            }
            println!("Pipeline execution completed successfully");
            Ok(())
        }
        Commands::Vault => {
            println!("{}", commands::vault_settings_json(&state)?);
            Ok(())
        }
    }
}

async fn serve(config: &ServerConfig, state: AppState) -> Result<()> {
    let app = router(Arc::new(state), &config.server.cors_origins);
    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!(%addr, "SentiNexuls API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("SentiNexuls API shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C signal"),
        () = terminate => info!("Received SIGTERM signal"),
    }
}
