//! Domain layer containing business entities and contracts.
//!
//! - [`entities`] - Core data structures
//! - [`repositories`] - Data access trait definitions
//! - [`qr_code`] - QR image capability used at creation time
//! - [`visit_event`] - Visit hand-off model
//! - [`visit_worker`] - Asynchronous visit processing
//!
//! # Visit Capture Flow
//!
//! 1. The redirect handler resolves a slug
//! 2. A [`visit_event::VisitEvent`] is pushed to a bounded channel
//! 3. The redirect response is returned immediately
//! 4. [`visit_worker::VisitWorker`] records the visit and bumps the counters

pub mod entities;
pub mod qr_code;
pub mod repositories;
pub mod visit_event;
pub mod visit_worker;
