//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`Link`] - A short code mapped to a destination URL and its owner
//! - [`Click`] - A recorded visit to a short link
//! - [`Owner`] - An identity that creates links and reads their analytics
//!
//! Entities follow the "New Type" pattern with separate structs for creation:
//! `NewLink`, `NewClick`.

pub mod click;
pub mod link;
pub mod owner;

pub use click::{Click, NewClick};
pub use link::{Link, NewLink};
pub use owner::Owner;
