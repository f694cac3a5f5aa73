//! Common library for the authentication service
//!
//! This crate provides the shared infrastructure clients: the PostgreSQL
//! connection pool and document collections, the Redis connection used for
//! sessions, and their error types.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, init_pool, health_check};
//! use common::document::Collection;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::default();
//!     let pool = init_pool(&config).await?;
//!     println!("Database health check: {}", health_check(&pool).await?);
//!
//!     let users = Collection::new(pool, &config.collection, config.query_timeout())?;
//!     users.ensure().await?;
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod database;
pub mod document;
pub mod error;
