//! PostgreSQL implementation of click repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::OwnerId;
use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::{ClickRepository, ClickTally};
use crate::error::AppError;

/// PostgreSQL repository for click recording and aggregate counts.
///
/// Clicks are append-only. Totals are computed with `COUNT(*)` at read time,
/// so concurrent inserts never lose an increment.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn record_click(&self, new_click: NewClick) -> Result<Click, AppError> {
        let click = sqlx::query_as::<_, Click>(
            r#"
            INSERT INTO clicks (link_code, clicked_at, source_addr, user_agent)
            VALUES ($1, $2, $3, $4)
            RETURNING id, link_code, clicked_at, source_addr, user_agent
            "#,
        )
        .bind(&new_click.link_code)
        .bind(new_click.clicked_at)
        .bind(&new_click.source_addr)
        .bind(&new_click.user_agent)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(click)
    }

    async fn tally_for_code(&self, code: &str) -> Result<ClickTally, AppError> {
        let row: Option<(OwnerId, i64)> = sqlx::query_as(
            r#"
            SELECT l.owner_id, COUNT(c.id)
            FROM links l
            LEFT JOIN clicks c ON c.link_code = l.code
            WHERE l.code = $1
            GROUP BY l.owner_id
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        let (owner_id, total) = row.ok_or_else(|| {
            AppError::not_found("Short link not found", json!({ "code": code }))
        })?;

        Ok(ClickTally { owner_id, total })
    }

    async fn count_for_code_and_owner(
        &self,
        code: &str,
        owner_id: OwnerId,
    ) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM clicks c
            JOIN links l ON l.code = c.link_code
            WHERE c.link_code = $1 AND l.owner_id = $2
            "#,
        )
        .bind(code)
        .bind(owner_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clicks")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
