//! Replicated set-membership cache over claimed handles.
//!
//! Mirrors the set of permanently claimed handles so availability checks can
//! short-circuit without touching the authoritative store. The cache is
//! disposable and lazily warmed; it may under-report (cold start, partial
//! seed) but must never over-report.
//!
//! # Contract
//!
//! 1. **Positive answers are authoritative**: `contains == true` means the
//!    handle was confirmed claimed at insertion time.
//! 2. **Negative answers are advisory**: `contains == false` means "unknown,
//!    verify against the store".
//! 3. **Failures are distinguishable**: a backend outage surfaces as `Err`,
//!    never as a definitive negative, so callers can degrade to the store
//!    instead of reporting a handle as free.

mod error;
mod memory;
mod redis_cache;

pub use error::{CacheError, CacheResult};
pub use memory::InMemoryAvailabilityCache;
pub use redis_cache::RedisAvailabilityCache;

use async_trait::async_trait;

/// Set-membership cache over claimed handles.
///
/// All handles are expected to be normalized (trimmed, lower-cased) before
/// they reach the cache; the cache itself does not normalize.
#[async_trait]
pub trait AvailabilityCache: Send + Sync {
    /// Membership test for a normalized handle.
    async fn contains(&self, name: &str) -> CacheResult<bool>;

    /// Idempotent insertion of a single handle.
    async fn add(&self, name: &str) -> CacheResult<()>;

    /// Idempotent insertion of a batch of handles in one backend command.
    async fn add_batch(&self, names: &[String]) -> CacheResult<()>;

    /// Remove every entry. Used by the seeder before a full reload.
    async fn clear(&self) -> CacheResult<()>;

    /// Number of handles currently in the set.
    async fn count(&self) -> CacheResult<u64>;
}
