//! Destination URL validation.
//!
//! URLs are stored and hashed exactly as submitted (minus surrounding
//! whitespace); validation only rejects inputs that cannot be redirected to
//! safely.

use url::Url;

/// Errors that can occur during URL validation.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,
}

/// Validates a destination URL and returns its trimmed form.
///
/// # Rules
///
/// 1. Must parse as an absolute URL
/// 2. Scheme must be `http` or `https`
/// 3. Must contain a host
///
/// Rejects potentially dangerous protocols like `javascript:`, `data:`, `file:`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(validate_target_url("  https://example.com ").unwrap(), "https://example.com");
/// assert!(validate_target_url("javascript:alert(1)").is_err());
/// ```
pub fn validate_target_url(input: &str) -> Result<&str, UrlValidationError> {
    let trimmed = input.trim();

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(trimmed)
}
