use std::sync::Arc;

use anyhow::Context;
use tokio::{
    net::TcpListener,
    signal::{self, ctrl_c},
};
use tracing::info;

use plantify_api::{app, config::ApiConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    plantify_observability::init();

    let config = ApiConfig::from_env().context("environment misconfigured")?;
    if config.admin_token.is_none() {
        tracing::warn!("PLANTIFY_ADMIN_TOKEN not set; write routes are open");
    }

    info!("Initializing services...");
    let services = app::services::build_services(&config)
        .await
        .context("failed to initialize services")?;
    let app = app::build_app(Arc::new(services), &config);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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
