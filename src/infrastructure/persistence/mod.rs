//! Store implementations of the domain repository traits.
//!
//! PostgreSQL repositories use runtime-checked SQLx queries mapped onto
//! `FromRow` structs, each call bounded by the configured store timeout. The
//! in-memory repositories back development runs without a database and the
//! HTTP integration tests.
//!
//! # Repositories
//!
//! - [`PgUrlRepository`] - URL record storage
//! - [`PgVisitRepository`] - Visit log storage
//! - [`InMemoryUrlRepository`] / [`InMemoryVisitRepository`] - Process-local store

pub mod memory;
pub mod pg_url_repository;
pub mod pg_visit_repository;

pub use memory::{InMemoryUrlRepository, InMemoryVisitRepository};
pub use pg_url_repository::PgUrlRepository;
pub use pg_visit_repository::PgVisitRepository;

use std::future::Future;
use std::time::Duration;

use tracing::error;

use crate::error::AppError;

/// Runs a single store call under `limit`.
///
/// An elapsed timer is logged and reported as an opaque internal error, the
/// same as any other store failure.
pub(crate) async fn bounded<T, F>(
    limit: Duration,
    operation: &'static str,
    call: F,
) -> Result<T, AppError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(AppError::from),
        Err(_) => {
            error!(
                operation,
                timeout_ms = limit.as_millis() as u64,
                "Store call timed out"
            );
            Err(AppError::opaque())
        }
    }
}
