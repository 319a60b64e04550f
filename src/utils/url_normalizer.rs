//! URL validation and normalization.
//!
//! Accepted input is a host name with an optional `http`/`https` scheme and an
//! optional path; the scheme may be omitted (`example.com/a`). The stored form
//! is the trimmed input in lower case.

use regex::Regex;
use std::sync::LazyLock;

/// Host with at least one dot and a 2+ character last label, optional path.
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(https?://)?([A-Za-z0-9_-]+\.)*([A-Za-z0-9_-]+\.[A-Za-z0-9_-]{2,})(/[A-Za-z0-9_./?%&=-]*)?$",
    )
    .expect("URL pattern is valid")
});

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum UrlNormalizationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL is invalid: {0}")]
    InvalidFormat(String),
}

/// Validates a URL and returns its stored form.
///
/// # Errors
///
/// Returns [`UrlNormalizationError::Empty`] for blank input and
/// [`UrlNormalizationError::InvalidFormat`] when the URL does not match the
/// accepted shape.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_url("Example.com/A").unwrap(), "example.com/a");
/// assert_eq!(normalize_url(" https://Docs.RS ").unwrap(), "https://docs.rs");
/// assert!(normalize_url("javascript:alert(1)").is_err());
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlNormalizationError::Empty);
    }

    let lowered = trimmed.to_lowercase();
    if !URL_REGEX.is_match(&lowered) {
        return Err(UrlNormalizationError::InvalidFormat(trimmed.to_string()));
    }

    Ok(lowered)
}

/// Returns an absolute redirect target for a stored URL.
///
/// Stored URLs may omit the scheme; those are redirected over plain HTTP so the
/// browser does not treat them as a relative path.
pub fn redirect_target(stored: &str) -> String {
    if stored.starts_with("http://") || stored.starts_with("https://") {
        stored.to_string()
    } else {
        format!("http://{stored}")
    }
}
