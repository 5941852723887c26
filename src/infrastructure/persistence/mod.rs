//! Record store implementations.
//!
//! # Repositories
//!
//! - [`PgRecordRepository`] - PostgreSQL storage via SQLx
//! - [`InMemoryRecordRepository`] - Process-local storage for tests and local runs

pub mod memory_record_repository;
pub mod pg_record_repository;

pub use memory_record_repository::InMemoryRecordRepository;
pub use pg_record_repository::PgRecordRepository;
