//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern and are
//! implemented by concrete repositories in the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Short link storage and lookup
//! - [`ClickRepository`] - Click recording and aggregate counts
//! - [`OwnerRepository`] - Owner accounts (administration only)

pub mod click_repository;
pub mod link_repository;
pub mod owner_repository;

pub use click_repository::{ClickRepository, ClickTally};
pub use link_repository::LinkRepository;
pub use owner_repository::OwnerRepository;

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
