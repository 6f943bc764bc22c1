//! Distributed, TTL-bounded mutual exclusion keyed by handle.
//!
//! The lock is an advisory race-narrowing device, not a correctness boundary:
//! the authoritative store's uniqueness constraint decides every race the
//! lock fails to prevent. That split keeps the backend requirements minimal —
//! any store offering atomic conditional-insert-with-expiry can serve as a
//! [`LockBackend`] — while still giving claimants a clean "being claimed by
//! someone else, try again" answer instead of racing straight into a
//! constraint violation.
//!
//! Release is best-effort. A lock abandoned by a crashed or cancelled holder
//! expires via its TTL; nothing force-releases it.

mod error;
mod manager;
mod memory;
mod redis_lock;

pub use error::{LockError, LockResult};
pub use manager::{LockGuard, LockManager};
pub use memory::InMemoryLockBackend;
pub use redis_lock::RedisLockBackend;

use async_trait::async_trait;
use std::time::Duration;

/// Backend offering atomic conditional-insert-with-expiry.
#[async_trait]
pub trait LockBackend: Send + Sync {
    /// Create `key` with lifetime `ttl` only if it is absent.
    ///
    /// Returns `true` only if this call created the key.
    async fn try_acquire(&self, key: &str, ttl: Duration) -> LockResult<bool>;

    /// Delete `key`. Callers treat failure as non-fatal; the TTL bounds the
    /// worst case.
    async fn release(&self, key: &str) -> LockResult<()>;
}
