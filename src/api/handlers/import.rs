//! Handlers for imports and import job tracking.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::import::{ImportAccepted, ImportBody, JobListResponse};
use crate::application::services::ImportStart;
use crate::domain::entities::ImportJob;
use crate::error::AppError;
use crate::state::AppState;

/// Starts an import or previews one.
///
/// # Endpoint
///
/// `POST /gsc/import`
///
/// # Request Body
///
/// ```json
/// {
///   "site_url": "https://example.com/",
///   "start_date": "2024-01-01",
///   "end_date": "2024-01-31",
///   "dry_run": false
/// }
/// ```
///
/// # Response Codes
///
/// - **200 OK**: Dry run; body is the connector's estimate
/// - **202 Accepted**: Import launched; body carries the job snapshot
///
/// A real import returns before the connector has finished; poll
/// `GET /gsc/import/jobs/{id}` for the outcome.
pub async fn import_handler(
    State(state): State<AppState>,
    payload: Result<Json<ImportBody>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    let request = payload.into_request().map_err(|e| state.upstream(e))?;

    let start = state
        .import_service
        .start(request)
        .await
        .map_err(|e| state.upstream(e))?;

    Ok(match start {
        ImportStart::Preview(preview) => Json(preview).into_response(),
        ImportStart::Started(handle) => (
            StatusCode::ACCEPTED,
            Json(ImportAccepted {
                message: "Import started in the background".to_string(),
                dry_run: false,
                job: handle.snapshot(),
            }),
        )
            .into_response(),
    })
}

/// `GET /gsc/import/jobs` - every tracked job, newest first.
pub async fn job_list_handler(State(state): State<AppState>) -> Json<JobListResponse> {
    let jobs = state.import_service.jobs().await;
    Json(JobListResponse {
        total: jobs.len(),
        jobs,
    })
}

/// `GET /gsc/import/jobs/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if no job with this id was started by this process.
pub async fn job_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ImportJob>, AppError> {
    let Path(id) = id?;
    state
        .import_service
        .job(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found("Import job not found", json!({ "id": id })))
}
