//! Redis cache module
//!
//! This module provides a shared Redis client and basic cache operations
//! like get and set with TTL support. Every command is bounded by the
//! configured timeout.

use redis::{AsyncCommands, Client, aio::MultiplexedConnection};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::info;

use crate::error::{CacheError, CacheResult};

/// Configuration for Redis connection
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL (e.g., "redis://localhost:6379")
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Deadline for a single command in seconds
    #[serde(default = "default_command_timeout")]
    pub command_timeout: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            command_timeout: default_command_timeout(),
        }
    }
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_command_timeout() -> u64 {
    5
}

/// Shared Redis connection
///
/// Wraps a multiplexed connection; clones share the same underlying socket.
#[derive(Clone)]
pub struct RedisPool {
    conn: MultiplexedConnection,
    timeout: Duration,
}

impl RedisPool {
    /// Connect to Redis
    pub async fn new(config: &RedisConfig) -> CacheResult<Self> {
        let timeout = Duration::from_secs(config.command_timeout);
        let client = Client::open(config.url.as_str())?;
        let conn = tokio::time::timeout(timeout, client.get_multiplexed_async_connection())
            .await
            .map_err(|_| CacheError::Timeout(timeout))??;

        info!("Redis client initialized");
        Ok(RedisPool { conn, timeout })
    }

    /// Set a key-value pair in Redis with optional TTL
    pub async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> CacheResult<()> {
        let mut conn = self.conn.clone();

        match ttl_seconds {
            Some(ttl) => self.bounded(conn.set_ex::<_, _, ()>(key, value, ttl)).await?,
            None => self.bounded(conn.set::<_, _, ()>(key, value)).await?,
        }

        Ok(())
    }

    /// Get a value from Redis by key
    pub async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.conn.clone();
        self.bounded(conn.get::<_, Option<String>>(key)).await
    }

    /// Delete a key from Redis
    pub async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        self.bounded(conn.del::<_, u64>(key)).await?;
        Ok(())
    }

    /// Check if Redis is reachable
    pub async fn health_check(&self) -> CacheResult<bool> {
        let mut conn = self.conn.clone();
        let pong: String = self
            .bounded(redis::cmd("PING").query_async(&mut conn))
            .await?;
        Ok(pong == "PONG")
    }

    async fn bounded<F, T>(&self, command: F) -> CacheResult<T>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        bounded(self.timeout, command).await
    }
}

async fn bounded<F, T>(timeout: Duration, command: F) -> CacheResult<T>
where
    F: Future<Output = redis::RedisResult<T>>,
{
    tokio::time::timeout(timeout, command)
        .await
        .map_err(|_| CacheError::Timeout(timeout))?
        .map_err(CacheError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redis_config_defaults() {
        let config: RedisConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.url, "redis://localhost:6379");
        assert_eq!(config.command_timeout, 5);
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected() {
        let config = RedisConfig {
            url: "not-a-redis-url".to_string(),
            command_timeout: 1,
        };

        let result = RedisPool::new(&config).await;
        assert!(matches!(result, Err(CacheError::Redis(_))));
    }

    #[tokio::test]
    async fn test_stalled_command_is_timeout() {
        let timeout = Duration::from_millis(1);

        let result = bounded(timeout, std::future::pending::<redis::RedisResult<()>>()).await;
        assert!(matches!(result, Err(CacheError::Timeout(d)) if d == timeout));
    }

    #[tokio::test]
    async fn test_command_error_is_redis_error() {
        let failed = async {
            Err::<(), _>(redis::RedisError::from((
                redis::ErrorKind::ResponseError,
                "WRONGTYPE",
            )))
        };

        let result = bounded(Duration::from_secs(1), failed).await;
        assert!(matches!(result, Err(CacheError::Redis(_))));
    }
}
