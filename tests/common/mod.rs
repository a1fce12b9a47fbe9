#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, extract::ConnectInfo, middleware};
use chrono::{Duration as TokenTtl, Utc};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::Layer;

use linkpulse::api::middleware::auth;
use linkpulse::api::routes::{protected_routes, public_routes};
use linkpulse::application::services::AuthService;
use linkpulse::domain::OwnerId;
use linkpulse::domain::entities::{Click, Link, NewClick, NewLink};
use linkpulse::domain::repositories::{ClickRepository, ClickTally, LinkRepository};
use linkpulse::error::AppError;
use linkpulse::infrastructure::cache::NullCache;
use linkpulse::realtime::NotificationHub;
use linkpulse::state::{AppState, StateSettings};

pub const TEST_SECRET: &str = "test-signing-secret";
pub const BASE_URL: &str = "https://s.example.com";

/// Link and click store held in memory, with knobs to slow down or fail the
/// click insert.
#[derive(Default)]
pub struct InMemoryStore {
    links: Mutex<Vec<Link>>,
    clicks: Mutex<Vec<Click>>,
    next_click_id: AtomicI64,
    click_delay: Mutex<Option<Duration>>,
    fail_clicks: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every subsequent click insert sleeps for `delay` first.
    pub fn delay_clicks(&self, delay: Duration) {
        *self.click_delay.lock().unwrap() = Some(delay);
    }

    /// Every subsequent click insert fails with a store error.
    pub fn fail_clicks(&self) {
        self.fail_clicks.store(true, Ordering::SeqCst);
    }

    pub fn insert_link(&self, code: &str, long_url: &str, owner_id: OwnerId) {
        self.links.lock().unwrap().push(Link::new(
            code.to_string(),
            long_url.to_string(),
            owner_id,
            Utc::now(),
        ));
    }

    pub fn click_count(&self) -> usize {
        self.clicks.lock().unwrap().len()
    }

    pub fn clicks(&self) -> Vec<Click> {
        self.clicks.lock().unwrap().clone()
    }

    fn owner_of(&self, code: &str) -> Option<OwnerId> {
        self.links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.code == code)
            .map(|l| l.owner_id)
    }

    fn clicks_for(&self, code: &str) -> i64 {
        self.clicks
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.link_code == code)
            .count() as i64
    }
}

#[async_trait]
impl LinkRepository for InMemoryStore {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut links = self.links.lock().unwrap();
        if links.iter().any(|l| l.code == new_link.code) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "links_pkey" }),
            ));
        }

        let link = Link::new(
            new_link.code,
            new_link.long_url,
            new_link.owner_id,
            Utc::now(),
        );
        links.push(link.clone());
        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.code == code)
            .cloned())
    }

    async fn list_by_owner(&self, owner_id: OwnerId) -> Result<Vec<Link>, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|l| l.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.links.lock().unwrap().len() as i64)
    }
}

#[async_trait]
impl ClickRepository for InMemoryStore {
    async fn record_click(&self, new_click: NewClick) -> Result<Click, AppError> {
        let delay = *self.click_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_clicks.load(Ordering::SeqCst) {
            return Err(AppError::store("Database error", json!({})));
        }

        if self.owner_of(&new_click.link_code).is_none() {
            return Err(AppError::bad_request(
                "Referenced record does not exist",
                json!({ "constraint": "clicks_link_code_fkey" }),
            ));
        }

        let click = Click {
            id: self.next_click_id.fetch_add(1, Ordering::SeqCst) + 1,
            link_code: new_click.link_code,
            clicked_at: new_click.clicked_at,
            source_addr: new_click.source_addr,
            user_agent: new_click.user_agent,
        };
        self.clicks.lock().unwrap().push(click.clone());
        Ok(click)
    }

    async fn tally_for_code(&self, code: &str) -> Result<ClickTally, AppError> {
        let owner_id = self
            .owner_of(code)
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))?;

        Ok(ClickTally {
            owner_id,
            total: self.clicks_for(code),
        })
    }

    async fn count_for_code_and_owner(
        &self,
        code: &str,
        owner_id: OwnerId,
    ) -> Result<i64, AppError> {
        match self.owner_of(code) {
            Some(owner) if owner == owner_id => Ok(self.clicks_for(code)),
            _ => Ok(0),
        }
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        Ok(self.clicks.lock().unwrap().len() as i64)
    }
}

/// Builds application state around `store` with a freshly spawned hub.
pub fn create_test_state(store: Arc<InMemoryStore>) -> AppState {
    create_test_state_with_hub(store, NotificationHub::spawn(64))
}

pub fn create_test_state_with_hub(store: Arc<InMemoryStore>, hub: NotificationHub) -> AppState {
    AppState::new(
        store.clone(),
        store,
        Arc::new(NullCache::new()),
        hub,
        StateSettings {
            base_url: BASE_URL.to_string(),
            auth_secret: TEST_SECRET.to_string(),
            subscriber_buffer: 8,
        },
    )
}

/// Full route table without rate limiting, with a fixed peer address.
pub fn test_app(state: AppState) -> Router {
    let api = protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .merge(public_routes())
        .nest("/api", api)
        .layer(MockConnectInfoLayer)
        .with_state(state)
}

pub fn token_for(owner_id: OwnerId) -> String {
    AuthService::new(TEST_SECRET.to_string()).issue(owner_id, TokenTtl::hours(1))
}

pub fn bearer(owner_id: OwnerId) -> String {
    format!("Bearer {}", token_for(owner_id))
}

/// Polls `check` every 10ms until it holds or `timeout` elapses.
pub async fn eventually(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if check() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Waits until the hub reports exactly `expected` live subscribers.
pub async fn wait_for_subscribers(hub: &NotificationHub, expected: usize) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        if hub.subscriber_count().await == Some(expected) {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
