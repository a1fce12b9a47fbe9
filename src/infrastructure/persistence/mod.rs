//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with
//! bound parameters and `FromRow` mapping.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage and retrieval
//! - [`PgClickRepository`] - Click recording and aggregate counts
//! - [`PgOwnerRepository`] - Owner accounts

pub mod pg_click_repository;
pub mod pg_link_repository;
pub mod pg_owner_repository;

pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_owner_repository::PgOwnerRepository;
