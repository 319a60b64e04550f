//! Business logic services for the application layer.

pub mod alias_registry;
pub mod analytics_service;
pub mod auth_service;
pub mod redirect_service;
pub mod url_service;

pub use alias_registry::AliasRegistry;
pub use analytics_service::AnalyticsService;
pub use auth_service::{AuthService, Owner};
pub use redirect_service::RedirectService;
pub use url_service::{CreateUrl, ShortenedUrl, UrlService, page_offset};
