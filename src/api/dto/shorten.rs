//! DTOs for link shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The destination URL (must be valid HTTP/HTTPS).
    #[validate(url(message = "Invalid URL format"), length(max = 2048))]
    pub url: String,
}

/// A newly created (or already existing) short link.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub code: String,
    pub short_url: String,
    pub long_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten_request_validation() {
        let ok = ShortenRequest {
            url: "https://example.com".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = ShortenRequest {
            url: "not-a-url".to_string(),
        };
        assert!(bad.validate().is_err());

        let long = ShortenRequest {
            url: format!("https://example.com/{}", "a".repeat(2048)),
        };
        assert!(long.validate().is_err());
    }
}
