//! Job Trigger Service
//!
//! HTTP front door that launches Dagster jobs by name.

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trigger_service::{config::Settings, router::build_router, state::AppState};

/// Initialize tracing/logging.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,trigger_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting job trigger service"
    );

    // Settings are resolved once; any error here is fatal
    let settings = Settings::from_env()?;
    let state = AppState::from_settings(&settings)?;

    tracing::info!(
        endpoint = %settings.endpoint_url(),
        timeout_seconds = settings.timeout_seconds(),
        repository_location = %settings.orchestrator.repository_location,
        repository_name = %settings.orchestrator.repository_name,
        catalog_jobs = settings.jobs.len(),
        "Configuration loaded"
    );

    if state.auth.is_enabled() {
        tracing::info!(header = state.auth.header_name().as_str(), "API key authentication enabled");
    } else {
        tracing::warn!("API_KEY not set, authentication is DISABLED and anyone can trigger jobs");
    }

    let app = build_router(state, settings.server.cors_origins());

    let addr: SocketAddr = settings.server.bind_address().parse()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
