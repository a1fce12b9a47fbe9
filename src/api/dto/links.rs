//! DTOs for link listing endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One entry of an owner's link list.
#[derive(Debug, Serialize)]
pub struct LinkItem {
    pub short_id: String,
    pub original_url: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
}
