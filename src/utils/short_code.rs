//! Deterministic short code derivation.
//!
//! A short code is the first [`SHORT_CODE_LENGTH`] hex characters of the
//! SHA-256 digest of the destination URL. The same URL always yields the same
//! code. Distinct URLs may collide; collisions are rejected by
//! [`crate::application::services::LinkService`].

use sha2::{Digest, Sha256};

/// Number of characters in every short code.
pub const SHORT_CODE_LENGTH: usize = 8;

/// Derives the short code for `url`.
///
/// # Examples
///
/// ```ignore
/// let code = short_code("https://example.com");
/// assert_eq!(code.len(), 8);
/// assert_eq!(code, short_code("https://example.com"));
/// ```
pub fn short_code(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    let mut code = hex::encode(digest);
    code.truncate(SHORT_CODE_LENGTH);
    code
}

/// Returns true if `code` has the shape of a derived short code.
///
/// Used to reject obviously invalid codes before touching the store.
pub fn is_well_formed(code: &str) -> bool {
    code.len() == SHORT_CODE_LENGTH
        && code
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}
