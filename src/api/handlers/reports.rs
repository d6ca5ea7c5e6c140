//! Site-level reports: top-pages export and dashboard.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    response::{IntoResponse, Response},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::metrics::{CsvExportResponse, DashboardResponse, TopPagesResponse};
use crate::api::dto::query::{DashboardParams, ExportFormat, ExportParams, PeriodDto};
use crate::domain::aggregation;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::{site::site_property, window::last_days};

/// Exports the best pages of a site over the last `days` days.
///
/// # Endpoint
///
/// `GET /gsc/export/top-pages/{site}`
///
/// # Query Parameters
///
/// - `days` (optional): Window length, 1..=480 (default: 30)
/// - `limit` (optional): Number of pages, 1..=1000 (default: 100)
/// - `order_by` (optional): `clicks`, `impressions`, `ctr` or `position` (default: clicks)
/// - `format` (optional): `json` or `csv` (default: json)
///
/// # Response
///
/// JSON: `{"site_url", "period", "pages"}`. CSV: `{"csv_data": "url,clicks,..."}`.
pub async fn export_top_pages_handler(
    State(state): State<AppState>,
    site: Result<Path<String>, PathRejection>,
    params: Result<Query<ExportParams>, QueryRejection>,
) -> Result<Response, AppError> {
    let (Path(site), Query(params)) = (site?, params?);
    params.validate()?;
    let site_url = site_property(&site)?;
    let days = params.days();
    let range = last_days(days)?;

    let pages = state
        .metrics_service
        .top_pages(
            &site_url,
            range,
            params.order_by.unwrap_or_default(),
            params.limit(),
        )
        .await
        .map_err(|e| state.upstream(e))?;

    match params.format.unwrap_or_default() {
        ExportFormat::Json => Ok(Json(TopPagesResponse {
            site_url,
            period: PeriodDto::new(range, days),
            pages,
        })
        .into_response()),
        ExportFormat::Csv => {
            let csv_data = aggregation::to_csv(&pages).map_err(|e| {
                AppError::internal("Failed to render CSV", json!({ "reason": e.to_string() }))
            })?;
            Ok(Json(CsvExportResponse { csv_data }).into_response())
        }
    }
}

/// Totals, top ten pages and every collected page for a site.
///
/// # Endpoint
///
/// `GET /gsc/dashboard/{site}?days=30`
///
/// The number of pages pulled is bounded by `DASHBOARD_PAGE_CAP`.
pub async fn dashboard_handler(
    State(state): State<AppState>,
    site: Result<Path<String>, PathRejection>,
    params: Result<Query<DashboardParams>, QueryRejection>,
) -> Result<Json<DashboardResponse>, AppError> {
    let (Path(site), Query(params)) = (site?, params?);
    params.validate()?;
    let site_url = site_property(&site)?;
    let days = params.days();
    let range = last_days(days)?;

    let dashboard = state
        .metrics_service
        .dashboard(&site_url, range)
        .await
        .map_err(|e| state.upstream(e))?;

    Ok(Json(DashboardResponse::new(site_url, days, dashboard)))
}
