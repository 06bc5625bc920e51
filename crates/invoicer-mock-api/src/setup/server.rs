//! Server startup and graceful shutdown

use anyhow::Result;
use axum::Router;
use invoicer_core::MockServerConfig;

/// Start the server with graceful shutdown
pub async fn start_server(config: &MockServerConfig, app: Router) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.server_port);
    tracing::info!(addr = %addr, "Starting mock invoice API");

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::AddrInUse {
            anyhow::anyhow!("Port {} is already in use", config.server_port)
        } else {
            anyhow::anyhow!("Failed to bind {}: {}", addr, e)
        }
    })?;

    tracing::info!(
        environment = %config.environment,
        "Serving GET /invoice/{{id}}, GET /invoices, GET /invoices/vendor/{{name}}, POST /extract, GET /health"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Signal handler for graceful shutdown
///
/// # Panics
/// Panics if the Ctrl+C or SIGTERM handler cannot be installed.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }

    tracing::info!("Shutting down gracefully...");

    invoicer_infra::shutdown_telemetry().await;
}
