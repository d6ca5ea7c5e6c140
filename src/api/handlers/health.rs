//! Handlers for health and connector status endpoints.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{GscStatusResponse, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns façade health with the connector liveness check.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Connector answered its liveness probe
/// - **503 Service Unavailable**: Connector degraded or unreachable
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "connector": { "status": "ok" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let connector = state.gateway.health().await;
    let healthy = connector.is_healthy();

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks { connector },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Reports whether the connector is reachable.
///
/// # Endpoint
///
/// `GET /gsc/status`
///
/// Always answers 200; the outcome is in the body.
pub async fn gsc_status_handler(State(state): State<AppState>) -> Json<GscStatusResponse> {
    Json(state.gateway.health().await.into())
}
