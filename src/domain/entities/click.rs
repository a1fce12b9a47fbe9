//! Click entity representing a single redirect event.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A click recorded when a shortened link is resolved.
///
/// Append-only. The link's owner is not stored here; it is resolved by
/// joining with the link at aggregation time.
#[derive(Debug, Clone, FromRow)]
pub struct Click {
    pub id: i64,
    pub link_code: String,
    pub clicked_at: DateTime<Utc>,
    pub source_addr: Option<String>,
    pub user_agent: Option<String>,
}

/// Input data for recording a new click.
///
/// `link_code` must reference an existing link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClick {
    pub link_code: String,
    pub clicked_at: DateTime<Utc>,
    pub source_addr: Option<String>,
    pub user_agent: Option<String>,
}

impl From<crate::domain::click_event::ClickEvent> for NewClick {
    fn from(event: crate::domain::click_event::ClickEvent) -> Self {
        Self {
            link_code: event.code,
            clicked_at: event.occurred_at,
            source_addr: event.source_addr,
            user_agent: event.user_agent,
        }
    }
}
