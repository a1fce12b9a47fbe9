//! Repository trait for click recording and aggregation.

use crate::domain::OwnerId;
use crate::domain::entities::{Click, NewClick};
use crate::error::AppError;
use async_trait::async_trait;

/// Total clicks for one link together with the link's owner.
///
/// Computed by joining clicks with their link, so the count reflects whatever
/// rows are visible when the query runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickTally {
    pub owner_id: OwnerId,
    pub total: i64,
}

/// Repository interface for click tracking and aggregate counts.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Appends a click record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the referenced link does not exist.
    /// Returns [`AppError::Store`] on database errors.
    async fn record_click(&self, new_click: NewClick) -> Result<Click, AppError>;

    /// Counts all clicks for `code` and resolves the link's owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link has no clicks or does not exist.
    async fn tally_for_code(&self, code: &str) -> Result<ClickTally, AppError>;

    /// Counts clicks for `code` restricted to links owned by `owner_id`.
    ///
    /// Returns `0` when the code is unknown or belongs to another owner.
    async fn count_for_code_and_owner(&self, code: &str, owner_id: OwnerId)
    -> Result<i64, AppError>;

    /// Counts all clicks in the system.
    async fn count_all(&self) -> Result<i64, AppError>;
}
