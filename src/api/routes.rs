//! API route configuration.

use crate::api::handlers::{
    analytics_handler, health_handler, links_handler, live_handler, redirect_handler,
    shorten_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes open to anyone.
///
/// # Endpoints
///
/// - `GET /r/{code}` - Redirect to the destination URL
/// - `GET /live`     - WebSocket click notifications (token in query string)
/// - `GET /health`   - Component health
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/r/{code}", get(redirect_handler))
        .route("/live", get(live_handler))
        .route("/health", get(health_handler))
}

/// Routes protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `POST /shorten`          - Create a short link
/// - `GET  /links`            - List the caller's links
/// - `GET  /analytics/{code}` - Click total for one of the caller's links
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/links", get(links_handler))
        .route("/analytics/{code}", get(analytics_handler))
}
