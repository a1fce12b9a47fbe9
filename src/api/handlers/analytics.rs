//! Handler for per-link click analytics.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::api::dto::analytics::AnalyticsResponse;
use crate::api::middleware::auth::AuthenticatedOwner;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the total click count for one of the owner's links.
///
/// # Endpoint
///
/// `GET /api/analytics/{code}`
///
/// Live subscribers that missed an update use this to resynchronize.
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown or owned by someone else.
pub async fn analytics_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    Extension(AuthenticatedOwner(owner_id)): Extension<AuthenticatedOwner>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let total_clicks = state
        .analytics_service
        .total_clicks(owner_id, &code)
        .await?;

    Ok(Json(AnalyticsResponse {
        link_id: code,
        total_clicks,
    }))
}
