//! Link creation, resolution and listing service.

use std::sync::Arc;

use crate::domain::OwnerId;
use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::short_code::{is_well_formed, short_code};
use crate::utils::url_validator::validate_target_url;
use serde_json::json;
use tracing::{debug, warn};

/// Service for creating, resolving and listing shortened links.
///
/// Short codes are derived from the destination URL, so creating the same
/// URL twice for the same owner yields the same link. Any other mapping that
/// already occupies the derived code is rejected with a conflict.
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    cache: Arc<dyn CacheService>,
    base_url: String,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    ///
    /// `base_url` is the public origin used to build short URLs
    /// (e.g. `https://s.example.com`).
    pub fn new(link_repository: Arc<L>, cache: Arc<dyn CacheService>, base_url: String) -> Self {
        Self {
            link_repository,
            cache,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Creates a short link for `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is not a valid HTTP(S) URL.
    /// Returns [`AppError::Conflict`] if the derived code is already taken by
    /// a different URL or by another owner.
    pub async fn create_link(&self, owner_id: OwnerId, long_url: &str) -> Result<Link, AppError> {
        let long_url = validate_target_url(long_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        let code = short_code(long_url);

        if let Some(existing) = self.link_repository.find_by_code(&code).await? {
            if existing.long_url == long_url && existing.is_owned_by(owner_id) {
                debug!("Link {} already exists for owner {}", code, owner_id);
                return Ok(existing);
            }

            return Err(AppError::conflict(
                "Short code already in use",
                json!({ "code": code }),
            ));
        }

        let new_link = NewLink {
            code,
            long_url: long_url.to_string(),
            owner_id,
        };

        self.link_repository.create(new_link).await
    }

    /// Resolves a short code to its destination URL.
    ///
    /// Consults the cache first and backfills it on a store hit without
    /// waiting for the write. Cache errors fall back to the store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown.
    /// Returns [`AppError::Store`] on database errors.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        if !is_well_formed(code) {
            return Err(not_found(code));
        }

        match self.cache.get_url(code).await {
            Ok(Some(url)) => return Ok(url),
            Ok(None) => {}
            Err(e) => warn!("Cache error for {}: {}", code, e),
        }

        let link = self
            .link_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| not_found(code))?;

        let cache = self.cache.clone();
        let code = link.code.clone();
        let url = link.long_url.clone();
        tokio::spawn(async move {
            if let Err(e) = cache.set_url(&code, &url, None).await {
                warn!("Failed to cache URL for {}: {}", code, e);
            }
        });

        Ok(link.long_url)
    }

    /// Lists links created by `owner_id`, newest first.
    pub async fn list_links(&self, owner_id: OwnerId) -> Result<Vec<Link>, AppError> {
        self.link_repository.list_by_owner(owner_id).await
    }

    /// Counts all links; doubles as a store liveness probe.
    pub async fn total_links(&self) -> Result<i64, AppError> {
        self.link_repository.count().await
    }

    /// Builds the public short URL for `code`.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/r/{}", self.base_url, code)
    }
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "code": code }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::infrastructure::cache::NullCache;
    use chrono::Utc;

    fn service(repo: MockLinkRepository) -> LinkService<MockLinkRepository> {
        LinkService::new(
            Arc::new(repo),
            Arc::new(NullCache::new()),
            "https://s.example.com/".to_string(),
        )
    }

    fn link(code: &str, url: &str, owner_id: OwnerId) -> Link {
        Link::new(code.to_string(), url.to_string(), owner_id, Utc::now())
    }

    #[tokio::test]
    async fn test_create_link_success() {
        let mut repo = MockLinkRepository::new();
        let expected_code = short_code("https://example.com");

        repo.expect_find_by_code()
            .times(1)
            .returning(|_| Ok(None));

        let code = expected_code.clone();
        repo.expect_create()
            .withf(move |new_link| {
                new_link.code == code
                    && new_link.long_url == "https://example.com"
                    && new_link.owner_id == 1
            })
            .times(1)
            .returning(|new_link| {
                Ok(link(&new_link.code, &new_link.long_url, new_link.owner_id))
            });

        let created = service(repo)
            .create_link(1, "https://example.com")
            .await
            .unwrap();

        assert_eq!(created.code, expected_code);
        assert_eq!(created.code.len(), 8);
    }

    #[tokio::test]
    async fn test_create_link_invalid_url() {
        let repo = MockLinkRepository::new();

        let result = service(repo).create_link(1, "not-a-url").await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_link_same_owner_same_url_is_idempotent() {
        let mut repo = MockLinkRepository::new();
        let code = short_code("https://example.com");
        let existing = link(&code, "https://example.com", 1);

        repo.expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_create().times(0);

        let result = service(repo)
            .create_link(1, "https://example.com")
            .await
            .unwrap();

        assert_eq!(result.code, code);
    }

    #[tokio::test]
    async fn test_create_link_collision_with_other_url_is_conflict() {
        let mut repo = MockLinkRepository::new();
        let code = short_code("https://example.com");
        let occupant = link(&code, "https://other.example.com", 1);

        repo.expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(occupant.clone())));
        repo.expect_create().times(0);

        let result = service(repo).create_link(1, "https://example.com").await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_create_link_same_url_other_owner_is_conflict() {
        let mut repo = MockLinkRepository::new();
        let code = short_code("https://example.com");
        let occupant = link(&code, "https://example.com", 2);

        repo.expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(occupant.clone())));
        repo.expect_create().times(0);

        let result = service(repo).create_link(1, "https://example.com").await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_resolve_found() {
        let mut repo = MockLinkRepository::new();
        let code = short_code("https://example.com");
        let stored = link(&code, "https://example.com", 1);

        repo.expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));

        let url = service(repo).resolve(&code).await.unwrap();

        assert_eq!(url, "https://example.com");
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));

        let result = service(repo).resolve("0123abcd").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolve_malformed_code_skips_store() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(0);

        let result = service(repo).resolve("health").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[test]
    fn test_short_url_trims_trailing_slash() {
        let svc = service(MockLinkRepository::new());

        assert_eq!(svc.short_url("abc12345"), "https://s.example.com/r/abc12345");
    }
}
