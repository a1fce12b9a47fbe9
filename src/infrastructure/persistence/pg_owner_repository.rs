//! PostgreSQL implementation of owner repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::Owner;
use crate::domain::repositories::OwnerRepository;
use crate::error::AppError;

/// PostgreSQL repository for owner accounts.
pub struct PgOwnerRepository {
    pool: Arc<PgPool>,
}

impl PgOwnerRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OwnerRepository for PgOwnerRepository {
    async fn create(&self, email: &str) -> Result<Owner, AppError> {
        let owner = sqlx::query_as::<_, Owner>(
            r#"
            INSERT INTO owners (email)
            VALUES ($1)
            RETURNING id, email, created_at
            "#,
        )
        .bind(email)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(owner)
    }

    async fn list(&self) -> Result<Vec<Owner>, AppError> {
        let owners =
            sqlx::query_as::<_, Owner>("SELECT id, email, created_at FROM owners ORDER BY id")
                .fetch_all(self.pool.as_ref())
                .await?;

        Ok(owners)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM owners")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
