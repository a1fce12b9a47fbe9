//! Utility functions for short code derivation and URL validation.
//!
//! - [`short_code`] - Deterministic short code derivation
//! - [`url_validator`] - Destination URL checks

pub mod short_code;
pub mod url_validator;
