//! Repository trait for owner accounts.

use crate::domain::entities::Owner;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for owner accounts.
///
/// Used by the `admin` CLI; the HTTP surface only ever sees owner ids carried
/// inside verified tokens.
#[async_trait]
pub trait OwnerRepository: Send + Sync {
    /// Creates an owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    async fn create(&self, email: &str) -> Result<Owner, AppError>;

    /// Lists all owners ordered by id.
    async fn list(&self) -> Result<Vec<Owner>, AppError>;

    /// Counts all owners.
    async fn count(&self) -> Result<i64, AppError>;
}
