//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its destination URL.
///
/// # Endpoint
///
/// `GET /r/{code}`
///
/// # Request Flow
///
/// 1. Resolve the code (cache, then store)
/// 2. Hand a click event to the recorder on a detached task
/// 3. Return `302 Found`
///
/// The response never waits on click persistence or live notification, and
/// their failure never changes it.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, AppError> {
    let long_url = state.link_service.resolve(&code).await?;
    metrics::counter!("linkpulse_redirects_total").increment(1);

    let event = ClickEvent::new(
        code,
        Some(addr.ip().to_string()),
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
    );
    state.click_recorder.record_detached(event);

    Ok((StatusCode::FOUND, [(header::LOCATION, long_url)]).into_response())
}
