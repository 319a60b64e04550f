//! Application layer services implementing business logic.
//!
//! Services consume repository traits and capability traits from the domain
//! layer and give HTTP handlers, the visit worker and the admin CLI a single
//! API to call.
//!
//! # Available Services
//!
//! - [`services::url_service::UrlService`] - Short URL creation, listing and soft deletion
//! - [`services::alias_registry::AliasRegistry`] - Custom alias reservation
//! - [`services::redirect_service::RedirectService`] - Slug resolution for redirects
//! - [`services::analytics_service::AnalyticsService`] - Visit recording
//! - [`services::auth_service::AuthService`] - Identity token issuing and verification

pub mod services;
