//! Keyed lock acquisition returning scope-bound guards.

use crate::{LockBackend, LockResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Hands out TTL-bounded locks keyed by normalized handle.
///
/// The key prefix and TTL are instance configuration, not globals, so
/// isolated managers (one per test, one per namespace) never interfere.
pub struct LockManager {
    backend: Arc<dyn LockBackend>,
    key_prefix: String,
    ttl: Duration,
}

impl LockManager {
    pub fn new(backend: Arc<dyn LockBackend>, key_prefix: impl Into<String>, ttl: Duration) -> Self {
        Self {
            backend,
            key_prefix: key_prefix.into(),
            ttl,
        }
    }

    /// Try to take the lock for `name`.
    ///
    /// Returns `Ok(None)` when another claimant holds it; callers should
    /// surface that as transient contention, not as an error.
    pub async fn acquire(&self, name: &str) -> LockResult<Option<LockGuard>> {
        let key = format!("{}{}", self.key_prefix, name);

        let held = self.backend.try_acquire(&key, self.ttl).await?;
        if !held {
            debug!(key = %key, "Lock already held");
            return Ok(None);
        }

        debug!(key = %key, ttl_secs = self.ttl.as_secs(), "Acquired lock");

        Ok(Some(LockGuard {
            backend: self.backend.clone(),
            key,
            released: false,
        }))
    }
}

/// A held lock.
///
/// Call [`LockGuard::release`] for a deterministic release. Dropping the
/// guard without releasing spawns a best-effort release task, so every early
/// return and cancellation path in a claim still lets the lock go; if neither
/// runs, the TTL expires the record.
pub struct LockGuard {
    backend: Arc<dyn LockBackend>,
    key: String,
    released: bool,
}

impl LockGuard {
    /// The full backend key this guard holds.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Release the lock now.
    ///
    /// Backend failures are logged and swallowed: correctness never depends
    /// on prompt release, only on the TTL.
    pub async fn release(mut self) {
        self.released = true;
        if let Err(e) = self.backend.release(&self.key).await {
            warn!(key = %self.key, error = %e, "Failed to release lock, TTL will expire it");
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        let backend = self.backend.clone();
        let key = std::mem::take(&mut self.key);

        // Outside a runtime there is nothing to spawn on; the TTL covers it.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                if let Err(e) = backend.release(&key).await {
                    warn!(key = %key, error = %e, "Failed to release dropped lock, TTL will expire it");
                }
            });
        }
    }
}
