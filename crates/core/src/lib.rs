//! Techfolio Core - Domain entities, services, and traits.
//!
//! This crate contains the core business logic for the technology-portfolio
//! backend. It is database-agnostic and defines repository traits that are
//! implemented by the `storage-sqlite` crate; the non-blocking aggregation
//! and streaming pipeline lives in `summary` and `stream`.

pub mod errors;
pub mod events;
pub mod portfolios;
pub mod retry;
pub mod stream;
pub mod summary;
pub mod technologies;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
