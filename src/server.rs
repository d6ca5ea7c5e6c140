//! HTTP server initialization and runtime setup.
//!
//! Builds the connector gateway, wires the services and runs the Axum server.

use crate::config::Config;
use crate::domain::ConnectorGateway;
use crate::infrastructure::connector::HttpGateway;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the HTTP server with the given configuration.
///
/// The connector is probed once at startup; an unreachable connector is
/// logged but does not prevent the server from starting.
///
/// # Errors
///
/// Returns an error if:
/// - The HTTP client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let gateway: Arc<dyn ConnectorGateway> = Arc::new(
        HttpGateway::new(config.connector.clone()).context("Failed to build connector gateway")?,
    );

    let health = gateway.health().await;
    if health.is_healthy() {
        tracing::info!("Connector reachable at {}", config.connector.base_url());
    } else {
        tracing::warn!(
            status = ?health.status,
            message = health.message.as_deref().unwrap_or_default(),
            "Connector not healthy at startup"
        );
    }

    let state = AppState::new(gateway, config.dashboard_page_cap)
        .with_job_history(config.import_job_history);
    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;

    Ok(())
}
