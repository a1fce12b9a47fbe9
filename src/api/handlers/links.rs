//! Handler for listing an owner's links.

use axum::{Extension, Json, extract::State};

use crate::api::dto::links::LinkItem;
use crate::api::middleware::auth::AuthenticatedOwner;
use crate::error::AppError;
use crate::state::AppState;

/// Lists every link created by the authenticated owner, newest first.
///
/// # Endpoint
///
/// `GET /api/links`
pub async fn links_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedOwner(owner_id)): Extension<AuthenticatedOwner>,
) -> Result<Json<Vec<LinkItem>>, AppError> {
    let links = state.link_service.list_links(owner_id).await?;

    let items = links
        .into_iter()
        .map(|link| LinkItem {
            short_url: state.link_service.short_url(&link.code),
            short_id: link.code,
            original_url: link.long_url,
            created_at: link.created_at,
        })
        .collect();

    Ok(Json(items))
}
