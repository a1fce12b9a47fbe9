//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers and the background recording pipeline.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link creation, resolution and listing
//! - [`services::analytics_service::AnalyticsService`] - Owner-scoped click counts
//! - [`services::click_recorder::ClickRecorder`] - Click persistence and live notification
//! - [`services::auth_service::AuthService`] - Owner token verification

pub mod services;
