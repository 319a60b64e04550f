//! Short slug generation and custom alias validation.
//!
//! Generated slugs are derived from a SHA-256 digest over the long URL, the
//! current time in nanoseconds and a strictly increasing counter. Uniqueness is
//! probabilistic: no store lookup happens for generated slugs.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use base64::Engine as _;
use chrono::Utc;
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::error::AppError;

/// Length of every generated slug.
pub const SLUG_LENGTH: usize = 10;

/// Minimum length of a caller-supplied alias.
pub const MIN_ALIAS_LENGTH: usize = 4;

/// Maximum length of a caller-supplied alias.
pub const MAX_ALIAS_LENGTH: usize = 64;

/// URL-safe base64 alphabet, in encoding order.
const BASE64_URL_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Output alphabet: digits, upper case, lower case.
const BASE62_ALPHABET: &[u8; 62] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Path segments that would shadow service routes.
const RESERVED_ALIASES: &[&str] = &["health", "v1", "redirect"];

/// Process-wide generation counter.
///
/// Owned explicitly and shared through [`CodeGenerator`] so tests can start it
/// at a known value. Every call to [`SlugCounter::next`] yields a distinct value.
#[derive(Debug, Default)]
pub struct SlugCounter {
    value: AtomicU64,
}

impl SlugCounter {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Creates a counter whose first [`next`](Self::next) returns `start + 1`.
    pub fn starting_at(start: u64) -> Self {
        Self {
            value: AtomicU64::new(start),
        }
    }

    /// Increments the counter and returns the new value.
    pub fn next(&self) -> u64 {
        self.value.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Value returned by the most recent [`next`](Self::next).
    pub fn current(&self) -> u64 {
        self.value.load(Ordering::SeqCst)
    }
}

/// Produces fixed-length base62 slugs.
///
/// Output is deterministic in format only: two calls with the same URL differ
/// because the counter always advances.
#[derive(Debug, Clone, Default)]
pub struct CodeGenerator {
    counter: Arc<SlugCounter>,
}

impl CodeGenerator {
    pub fn new(counter: Arc<SlugCounter>) -> Self {
        Self { counter }
    }

    pub fn counter(&self) -> &SlugCounter {
        &self.counter
    }

    /// Generates a 10-character `[0-9A-Za-z]` slug for `original_url`.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let generator = CodeGenerator::default();
    /// let slug = generator.generate("example.com/a");
    /// assert_eq!(slug.len(), 10);
    /// assert!(slug.chars().all(|c| c.is_ascii_alphanumeric()));
    /// ```
    pub fn generate(&self, original_url: &str) -> String {
        loop {
            let nanos = Utc::now()
                .timestamp_nanos_opt()
                .unwrap_or_else(|| Utc::now().timestamp_micros().saturating_mul(1_000));
            let seed = format!("{}-{}-{}", original_url, nanos, self.counter.next());

            let digest = Sha256::digest(seed.as_bytes());
            let encoded = base64::engine::general_purpose::URL_SAFE.encode(digest);

            // A digest needs 34 of its 43 symbols to be `-` or `_` to come up short.
            let slug = to_base62(&encoded);
            if slug.len() == SLUG_LENGTH {
                return slug;
            }
        }
    }
}

/// Transliterates base64 symbols onto the base62 alphabet by position.
///
/// Symbols with no base62 counterpart are dropped: the padding `=` and the
/// two URL-safe symbols `-` and `_`. Output is at most [`SLUG_LENGTH`] long.
fn to_base62(encoded: &str) -> String {
    encoded
        .bytes()
        .filter_map(|b| BASE64_URL_ALPHABET.iter().position(|&c| c == b))
        .filter_map(|index| BASE62_ALPHABET.get(index).map(|&c| c as char))
        .take(SLUG_LENGTH)
        .collect()
}

/// Validates a caller-supplied alias.
///
/// # Rules
///
/// - Length: 4-64 characters
/// - Allowed characters: ASCII letters, digits, `-`, `_`
/// - Cannot be a reserved route segment
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_alias(alias: &str) -> Result<(), AppError> {
    if alias.len() < MIN_ALIAS_LENGTH {
        return Err(AppError::bad_request(
            format!("Alias needs to be at least {MIN_ALIAS_LENGTH} characters long"),
            json!({ "alias": alias, "provided_length": alias.len() }),
        ));
    }

    if alias.len() > MAX_ALIAS_LENGTH {
        return Err(AppError::bad_request(
            format!("Alias must be at most {MAX_ALIAS_LENGTH} characters long"),
            json!({ "provided_length": alias.len() }),
        ));
    }

    if !alias
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::bad_request(
            "Alias can only contain letters, digits, hyphens and underscores",
            json!({ "alias": alias }),
        ));
    }

    if RESERVED_ALIASES.contains(&alias.to_ascii_lowercase().as_str()) {
        return Err(AppError::bad_request(
            "This alias is reserved",
            json!({ "alias": alias }),
        ));
    }

    Ok(())
}
