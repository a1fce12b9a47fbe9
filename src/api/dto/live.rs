//! Query parameters for the live notification endpoint.

use serde::Deserialize;

/// Browsers cannot set headers on a WebSocket handshake, so the owner token
/// travels in the query string.
#[derive(Debug, Deserialize)]
pub struct LiveQuery {
    pub token: Option<String>,
}
