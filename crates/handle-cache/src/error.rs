//! Error types for the availability cache.

use thiserror::Error;

/// Availability cache error type.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Redis connection or command error
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Backend unreachable or misbehaving
    #[error("Cache backend error: {0}")]
    Backend(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
