//! Handlers exposing the connector's authentication state.

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::domain::entities::AuthStatus;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /gsc/auth/url`
///
/// Returns the OAuth consent URL issued by the connector as `{"auth_url": ...}`.
pub async fn auth_url_handler(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let auth_url = state
        .gateway
        .auth_url()
        .await
        .map_err(|e| state.upstream(e))?;

    Ok(Json(json!({ "auth_url": auth_url })))
}

/// `GET /gsc/auth/status`
pub async fn auth_status_handler(
    State(state): State<AppState>,
) -> Result<Json<AuthStatus>, AppError> {
    let status = state
        .gateway
        .auth_status()
        .await
        .map_err(|e| state.upstream(e))?;

    Ok(Json(status))
}
