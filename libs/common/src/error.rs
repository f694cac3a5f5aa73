//! Custom error types for the common library
//!
//! This module defines the error types returned by the document store and
//! the Redis cache clients.

use redis::RedisError;
use sqlx::Error as SqlxError;
use std::time::Duration;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred while creating a collection
    #[error("Database migration error: {0}")]
    Migration(#[source] SqlxError),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),

    /// A document could not be converted to or from JSON
    #[error("Document serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The database did not answer before the deadline
    #[error("Database operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Custom error type for cache operations
#[derive(Error, Debug)]
pub enum CacheError {
    /// Error reported by the Redis client
    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),

    /// Redis did not answer before the deadline
    #[error("Redis operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Type alias for Result with CacheError
pub type CacheResult<T> = Result<T, CacheError>;
