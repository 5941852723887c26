//! Application layer services implementing business logic.
//!
//! Services coordinate the record store, the id allocator and the cache, and
//! expose a small API to HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::shorten_service::ShortenService`] - Find-or-create for submitted URLs
//! - [`services::redirect_service::RedirectService`] - Short code resolution

pub mod services;
