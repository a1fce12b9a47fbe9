//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AnalyticsService, AuthService, ClickRecorder, LinkService};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::infrastructure::cache::CacheService;
use crate::realtime::NotificationHub;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub analytics_service: Arc<AnalyticsService<dyn LinkRepository, dyn ClickRepository>>,
    pub click_recorder: Arc<ClickRecorder<dyn ClickRepository>>,
    pub auth_service: Arc<AuthService>,
    pub hub: NotificationHub,
    pub cache: Arc<dyn CacheService>,
    /// Outbox depth for each live connection.
    pub subscriber_buffer: usize,
}

/// Settings that shape request handling but are not collaborators.
#[derive(Debug, Clone)]
pub struct StateSettings {
    pub base_url: String,
    pub auth_secret: String,
    pub subscriber_buffer: usize,
}

impl AppState {
    /// Wires services around the given repositories, cache and hub.
    ///
    /// `hub` must already be running; it is shared, not started, here.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        click_repository: Arc<dyn ClickRepository>,
        cache: Arc<dyn CacheService>,
        hub: NotificationHub,
        settings: StateSettings,
    ) -> Self {
        let link_service = Arc::new(LinkService::new(
            link_repository.clone(),
            cache.clone(),
            settings.base_url,
        ));
        let analytics_service = Arc::new(AnalyticsService::new(
            link_repository,
            click_repository.clone(),
        ));
        let click_recorder = Arc::new(ClickRecorder::new(click_repository, hub.clone()));

        Self {
            link_service,
            analytics_service,
            click_recorder,
            auth_service: Arc::new(AuthService::new(settings.auth_secret)),
            hub,
            cache,
            subscriber_buffer: settings.subscriber_buffer,
        }
    }
}
