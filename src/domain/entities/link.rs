//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::OwnerId;

/// A shortened URL owned by a single owner.
///
/// `code` is derived from `long_url` (see [`crate::utils::short_code`]) and is
/// unique across the whole service.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Link {
    pub code: String,
    pub long_url: String,
    pub owner_id: OwnerId,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        code: String,
        long_url: String,
        owner_id: OwnerId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            code,
            long_url,
            owner_id,
            created_at,
        }
    }

    /// Returns true if this link belongs to `owner_id`.
    pub fn is_owned_by(&self, owner_id: OwnerId) -> bool {
        self.owner_id == owner_id
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub code: String,
    pub long_url: String,
    pub owner_id: OwnerId,
}
