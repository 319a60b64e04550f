//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence and QR image hosting.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL and in-memory repository implementations
//! - [`qr_code`] - QR image references from an external rendering endpoint

pub mod persistence;
pub mod qr_code;
