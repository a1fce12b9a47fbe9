//! Live click-count update pushed to a link owner.

use serde::{Deserialize, Serialize};

/// A single click-count update for one link.
///
/// Serialized on the wire as `{"link_id": "...", "click_count": n}`.
/// Produced once per recorded click and delivered at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub link_id: String,
    pub click_count: i64,
}

impl Notification {
    pub fn new(link_id: impl Into<String>, click_count: i64) -> Self {
        Self {
            link_id: link_id.into(),
            click_count,
        }
    }
}
