//! Infrastructure layer for external integrations.
//!
//! # Modules
//!
//! - [`cache`] - Redirect cache (Redis and no-op implementations)
//! - [`persistence`] - Record store implementations

pub mod cache;
pub mod persistence;
