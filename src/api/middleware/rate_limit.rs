//! Rate limiting middleware using token bucket algorithm.

use axum::Router;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Token bucket parameters for one group of routes.
#[derive(Debug, Clone, Copy)]
pub struct Quota {
    pub per_second: u64,
    pub burst_size: u32,
}

/// Redirects, the live endpoint and health checks.
pub const PUBLIC: Quota = Quota {
    per_second: 20,
    burst_size: 100,
};

/// Authenticated `/api` routes.
pub const API: Quota = Quota {
    per_second: 5,
    burst_size: 20,
};

/// Creates a rate limiter keyed by `key_extractor`.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
pub fn layer<K: KeyExtractor>(
    key_extractor: K,
    quota: Quota,
) -> GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(key_extractor)
            .per_second(quota.per_second)
            .burst_size(quota.burst_size)
            .finish()
            .expect("rate limit quota must be non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

/// Applies `quota` to every route in `router`.
///
/// # Key Extraction
///
/// - `behind_proxy = false`: the socket peer address
/// - `behind_proxy = true`: `X-Forwarded-For` / `X-Real-IP` / `Forwarded`,
///   falling back to the peer address. Enable only behind a trusted proxy.
pub fn apply<S>(router: Router<S>, quota: Quota, behind_proxy: bool) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    if behind_proxy {
        router.layer(layer(SmartIpKeyExtractor, quota))
    } else {
        router.layer(layer(PeerIpKeyExtractor, quota))
    }
}
