use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tracing::{error, info};

use lnd_rest_exporter::api::create_router;
use lnd_rest_exporter::app::{AppState, CollectorRegistry, ExporterConfig, spawn_server};
use lnd_rest_exporter::domain::Heartbeat;
use lnd_rest_exporter::infra::{LndRestClient, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing(ExporterConfig::log_json_from_env())
        .context("failed to install tracing subscriber")?;

    let config = ExporterConfig::from_env().inspect_err(|e| {
        error!(error = %e, "Invalid configuration, refusing to start");
    })?;

    let heartbeat = Arc::new(Heartbeat::new());
    let client = Arc::new(LndRestClient::new(
        config.lnd_client_config(),
        Arc::clone(&heartbeat),
    )?);

    let registry = CollectorRegistry::from_spec(&config.metrics_spec, client, heartbeat)
        .inspect_err(|e| {
            error!(error = %e, "Invalid metrics specification, refusing to start");
        })?;
    info!(metrics = ?registry.names(), "Registered collectors");

    let state = Arc::new(AppState::new(registry, config.readiness_window()));
    let router = create_router(state);

    let addr = config.metrics_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {}", addr))?;

    let (mut server, shutdown_tx) = spawn_server(listener, router);

    tokio::select! {
        result = &mut server => {
            // The server only returns on its own when something broke.
            let outcome = result.context("metrics server task panicked")?;
            outcome.context("metrics server stopped unexpectedly")?;
            anyhow::bail!("metrics server stopped unexpectedly");
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
            let _ = shutdown_tx.send(true);
        }
    }

    server
        .await
        .context("metrics server task panicked")?
        .context("metrics server failed during shutdown")?;
    info!("Exporter stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
