//! Handlers for Search Console properties.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde_json::{Value, json};
use validator::Validate;

use crate::api::dto::query::CheckAccessParams;
use crate::domain::entities::AccessCheck;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the properties the connector's OAuth grant can read.
///
/// # Endpoint
///
/// `GET /gsc/properties`
///
/// # Response
///
/// ```json
/// {
///   "total": 1,
///   "properties": [
///     { "site_url": "https://example.com/", "display_name": "example.com", "type": "URL_PROPERTY" }
///   ]
/// }
/// ```
///
/// # Errors
///
/// Returns 401 with the re-authentication link if the connector has no
/// usable OAuth grant.
pub async fn properties_handler(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let properties = state
        .gateway
        .properties()
        .await
        .map_err(|e| state.upstream(e))?;

    Ok(Json(json!({
        "total": properties.len(),
        "properties": properties,
    })))
}

/// `GET /gsc/check-access?property=...`
pub async fn check_access_handler(
    State(state): State<AppState>,
    params: Result<Query<CheckAccessParams>, QueryRejection>,
) -> Result<Json<AccessCheck>, AppError> {
    let Query(params) = params?;
    params.validate()?;

    let check = state
        .gateway
        .check_access(&params.property)
        .await
        .map_err(|e| state.upstream(e))?;

    Ok(Json(check))
}
