//! Owner entity.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::OwnerId;

/// An account that owns short links.
#[derive(Debug, Clone, FromRow)]
pub struct Owner {
    pub id: OwnerId,
    pub email: String,
    pub created_at: DateTime<Utc>,
}
