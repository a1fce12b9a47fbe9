//! DTOs for analytics endpoint.

use serde::Serialize;

/// Aggregate click count for one link.
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub link_id: String,
    pub total_clicks: i64,
}
