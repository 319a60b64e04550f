//! Core domain entities.
//!
//! - [`UrlRecord`] - A shortened URL and its counters
//! - [`Visit`] - A recorded redirect
//!
//! Creation inputs live in separate structs (`NewUrlRecord`, `NewVisit`) so
//! store-assigned fields never have to be faked by callers.

pub mod url_record;
pub mod visit;

pub use url_record::{NewUrlRecord, UrlPage, UrlRecord};
pub use visit::{NewVisit, Visit};
