//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /r/{code}` - Short link redirect (public)
//! - `GET /live`     - Live click notifications over WebSocket (query token)
//! - `GET /health`   - Health check: database, hub, cache (public)
//! - `/api/*`        - REST API (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket, stricter on `/api`
//! - **Authentication** - Bearer token on `/api`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting keys on the forwarded client
///   IP instead of the peer socket address
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let api_router = rate_limit::apply(
        api::routes::protected_routes()
            .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer)),
        rate_limit::API,
        behind_proxy,
    );

    let public_router = rate_limit::apply(
        api::routes::public_routes(),
        rate_limit::PUBLIC,
        behind_proxy,
    );

    let router = Router::new()
        .merge(public_router)
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
