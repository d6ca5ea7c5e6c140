//! Handler for single-URL metrics.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use validator::Validate;

use crate::api::dto::metrics::UrlMetricsBody;
use crate::domain::entities::MetricsResult;
use crate::error::AppError;
use crate::state::AppState;

/// Totals and daily series for one URL.
///
/// # Endpoint
///
/// `POST /gsc/metrics/url`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/blog/post",
///   "start_date": "2024-01-01",
///   "end_date": "2024-01-31",
///   "country": "fra",
///   "device": "mobile"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for an invalid URL, date or country code.
pub async fn url_metrics_handler(
    State(state): State<AppState>,
    payload: Result<Json<UrlMetricsBody>, JsonRejection>,
) -> Result<Json<MetricsResult>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    let query = payload.into_query().map_err(|e| state.upstream(e))?;

    let result = state
        .metrics_service
        .url_metrics(&query)
        .await
        .map_err(|e| state.upstream(e))?;

    Ok(Json(result))
}
