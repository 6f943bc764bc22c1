//! Error types for the lock manager.

use thiserror::Error;

/// Lock backend error type.
#[derive(Error, Debug)]
pub enum LockError {
    /// Redis connection or command error
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Backend unreachable or misbehaving
    #[error("Lock backend error: {0}")]
    Backend(String),
}

/// Result type for lock operations.
pub type LockResult<T> = Result<T, LockError>;
