//! DTOs for health and connector status endpoints.

use serde::Serialize;

use crate::domain::entities::{HealthStatus, ServiceHealth};

/// Façade health with the connector check.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub connector: ServiceHealth,
}

/// `GET /gsc/status`
#[derive(Debug, Serialize)]
pub struct GscStatusResponse {
    pub gsc_service_healthy: bool,
    pub status: HealthStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<ServiceHealth> for GscStatusResponse {
    fn from(health: ServiceHealth) -> Self {
        Self {
            gsc_service_healthy: health.is_healthy(),
            status: health.status,
            message: health.message,
        }
    }
}
