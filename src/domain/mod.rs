//! Domain layer containing business entities and logic.
//!
//! This module defines entities, value types passed between components and
//! repository interfaces, independent of infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click metadata captured by the redirect handler
//! - [`notification`] - Live click-count update delivered to owners
//!
//! # Click Processing Flow
//!
//! 1. HTTP handler resolves the short code and answers with a redirect
//! 2. A [`click_event::ClickEvent`] is handed to a detached recording task
//! 3. The click is persisted via [`repositories::ClickRepository`]
//! 4. The fresh total is pushed to the owner as a [`notification::Notification`]

pub mod click_event;
pub mod entities;
pub mod notification;
pub mod repositories;

/// Identity of an authenticated link owner.
pub type OwnerId = i64;
