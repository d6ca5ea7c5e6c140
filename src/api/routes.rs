//! `/gsc` route configuration.

use crate::api::handlers::{
    auth_status_handler, auth_url_handler, check_access_handler, dashboard_handler,
    export_top_pages_handler, gsc_status_handler, import_handler, job_handler, job_list_handler,
    properties_handler, url_metrics_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Connector-facing routes, nested under `/gsc`.
///
/// # Endpoints
///
/// - `GET  /status`                   - Connector reachability
/// - `GET  /auth/url`                 - OAuth consent URL
/// - `GET  /auth/status`              - OAuth grant status
/// - `GET  /properties`               - Accessible properties
/// - `GET  /check-access`             - Access check for one property
/// - `POST /import`                   - Dry run or background import
/// - `GET  /import/jobs`              - Tracked import jobs
/// - `GET  /import/jobs/{id}`         - One import job
/// - `POST /metrics/url`              - Metrics for one URL
/// - `GET  /export/top-pages/{site}`  - Top pages as JSON or CSV
/// - `GET  /dashboard/{site}`         - Site dashboard
pub fn gsc_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(gsc_status_handler))
        .route("/auth/url", get(auth_url_handler))
        .route("/auth/status", get(auth_status_handler))
        .route("/properties", get(properties_handler))
        .route("/check-access", get(check_access_handler))
        .route("/import", post(import_handler))
        .route("/import/jobs", get(job_list_handler))
        .route("/import/jobs/{id}", get(job_handler))
        .route("/metrics/url", post(url_metrics_handler))
        .route("/export/top-pages/{site}", get(export_top_pages_handler))
        .route("/dashboard/{site}", get(dashboard_handler))
}
