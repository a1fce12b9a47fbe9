//! Handler for the live click notification endpoint.

use axum::{
    extract::{
        Query, State,
        ws::{WebSocketUpgrade, rejection::WebSocketUpgradeRejection},
    },
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::info;

use crate::api::dto::live::LiveQuery;
use crate::error::AppError;
use crate::realtime::run_session;
use crate::state::AppState;

/// Upgrades to a WebSocket that streams click counts for the token's owner.
///
/// # Endpoint
///
/// `GET /live?token=<owner token>`
///
/// Each recorded click on one of the owner's links produces one text frame:
///
/// ```json
/// { "link_id": "100680ad", "click_count": 3 }
/// ```
///
/// The token is checked before the upgrade is accepted.
///
/// # Errors
///
/// Returns 400 Bad Request if the token is missing.
/// Returns 401 Unauthorized if the token is invalid or expired.
pub async fn live_handler(
    State(state): State<AppState>,
    Query(query): Query<LiveQuery>,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, AppError> {
    let token = query
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::bad_request("Missing token", json!({ "param": "token" })))?;

    let owner_id = state.auth_service.verify(&token)?;

    let upgrade = match upgrade {
        Ok(upgrade) => upgrade,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    info!(owner = owner_id, "Live connection accepted");

    let hub = state.hub.clone();
    let buffer = state.subscriber_buffer;

    Ok(upgrade.on_upgrade(move |socket| run_session(socket, owner_id, hub, buffer)))
}
