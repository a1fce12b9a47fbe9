//! Owner-scoped click analytics.

use std::sync::Arc;

use crate::domain::OwnerId;
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;
use serde_json::json;

/// Service answering "how many clicks does my link have?".
///
/// Every query is filtered by both code and owner so a caller can never read
/// another owner's counts. This is also the fallback path for subscribers
/// that missed a live update.
pub struct AnalyticsService<L: LinkRepository + ?Sized, C: ClickRepository + ?Sized> {
    link_repository: Arc<L>,
    click_repository: Arc<C>,
}

impl<L: LinkRepository + ?Sized, C: ClickRepository + ?Sized> AnalyticsService<L, C> {
    /// Creates a new analytics service.
    pub fn new(link_repository: Arc<L>, click_repository: Arc<C>) -> Self {
        Self {
            link_repository,
            click_repository,
        }
    }

    /// Returns the total number of clicks on `code` for `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown or belongs to
    /// another owner. The two cases are indistinguishable to the caller.
    pub async fn total_clicks(&self, owner_id: OwnerId, code: &str) -> Result<i64, AppError> {
        let owned = self
            .link_repository
            .find_by_code(code)
            .await?
            .is_some_and(|link| link.is_owned_by(owner_id));

        if !owned {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "code": code }),
            ));
        }

        self.click_repository
            .count_for_code_and_owner(code, owner_id)
            .await
    }
}
