//! Handler for link shortening endpoint.

use axum::{Extension, Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::api::middleware::auth::AuthenticatedOwner;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for the authenticated owner.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "code": "100680ad",
///   "short_url": "https://s.example.com/r/100680ad",
///   "long_url": "https://example.com"
/// }
/// ```
///
/// Shortening the same URL twice returns the same link.
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is invalid.
/// Returns 409 Conflict if the derived code is held by another mapping.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedOwner(owner_id)): Extension<AuthenticatedOwner>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_link(owner_id, &payload.url)
        .await?;

    let short_url = state.link_service.short_url(&link.code);

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            code: link.code,
            short_url,
            long_url: link.long_url,
        }),
    ))
}
