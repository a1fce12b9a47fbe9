//! Click event model for asynchronous click tracking.

use chrono::{DateTime, Utc};

/// An in-memory representation of a click captured at redirect time.
///
/// Moved into the detached recording task so the HTTP response never waits
/// on the store. Client metadata is optional to handle missing headers.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub code: String,
    pub source_addr: Option<String>,
    pub user_agent: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl ClickEvent {
    /// Creates a click event stamped with the current time.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let event = ClickEvent::new(
    ///     "1f2e3d4c".to_string(),
    ///     Some("192.168.1.1".to_string()),
    ///     Some("Mozilla/5.0"),
    /// );
    /// ```
    pub fn new(code: String, source_addr: Option<String>, user_agent: Option<&str>) -> Self {
        Self {
            code,
            source_addr,
            user_agent: user_agent.map(|s| s.to_string()),
            occurred_at: Utc::now(),
        }
    }
}
