//! SQLite storage implementation for the techfolio backend.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in
//! `techfolio-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for portfolios and technologies
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies
//! exist. Reads run on the blocking pool so the async caller is released at
//! the I/O boundary; writes are serialized through a single-writer actor
//! holding one dedicated connection.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod portfolios;
pub mod technologies;

// Re-export database utilities
pub use db::{create_pool, get_connection, init, run_migrations, DbPool, WriteHandle};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from techfolio-core for convenience
pub use techfolio_core::errors::{DatabaseError, Error, Result};
