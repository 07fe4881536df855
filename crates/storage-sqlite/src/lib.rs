//! SQLite storage implementation for the Quotefab FX subsystem.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in
//! `quotefab-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The exchange-rate repository implementation
//! - Database-specific model types (with Diesel derives)
//!
//! This crate is the only place in the subsystem where Diesel dependencies
//! exist. The core crate is database-agnostic and works with traits.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod fx;

// Re-export database utilities
pub use db::{create_pool, get_connection, init, run_migrations, DbConnection, DbPool};

// Re-export storage errors
pub use errors::StorageError;

// Re-export from quotefab-core for convenience
pub use quotefab_core::errors::{DatabaseError, Error, Result};
