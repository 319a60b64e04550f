//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Slug generation and alias validation
//! - [`url_normalizer`] - URL validation and normalization
//! - [`expiry`] - `DD-MM-YYYY` expiry parsing
//! - [`user_agent`] - Browser and device classification
//! - [`client_info`] - Client IP and header extraction

pub mod client_info;
pub mod code_generator;
pub mod expiry;
pub mod url_normalizer;
pub mod user_agent;
