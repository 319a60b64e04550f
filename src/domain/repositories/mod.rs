//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated via
//! `mockall` for unit tests.
//!
//! - [`UrlRepository`] - URL records: create, lookup, listing, soft delete, counters
//! - [`VisitRepository`] - Append-only visit log

pub mod url_repository;
pub mod visit_repository;

pub use url_repository::UrlRepository;
pub use visit_repository::VisitRepository;

#[cfg(test)]
pub use url_repository::MockUrlRepository;
#[cfg(test)]
pub use visit_repository::MockVisitRepository;
