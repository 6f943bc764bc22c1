//! In-memory implementation of the lock backend.
//!
//! Process-local equivalent of the Redis backend, with the same
//! conditional-insert-with-expiry semantics. Used by tests and by
//! single-process deployments without a shared backend.

use crate::{LockBackend, LockResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Lock backend holding expiring keys in a process-local map.
#[derive(Default)]
pub struct InMemoryLockBackend {
    held: Mutex<HashMap<String, Instant>>,
}

impl InMemoryLockBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LockBackend for InMemoryLockBackend {
    async fn try_acquire(&self, key: &str, ttl: Duration) -> LockResult<bool> {
        let mut held = self.held.lock().expect("lock poisoned");
        let now = Instant::now();

        // Expired entries count as absent.
        if let Some(expires_at) = held.get(key) {
            if *expires_at > now {
                return Ok(false);
            }
        }

        held.insert(key.to_string(), now + ttl);
        Ok(true)
    }

    async fn release(&self, key: &str) -> LockResult<()> {
        self.held.lock().expect("lock poisoned").remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn acquire_is_exclusive() {
        let backend = InMemoryLockBackend::new();

        assert!(backend
            .try_acquire("k", Duration::from_secs(10))
            .await
            .unwrap());
        assert!(!backend
            .try_acquire("k", Duration::from_secs(10))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn release_allows_reacquire() {
        let backend = InMemoryLockBackend::new();

        assert!(backend
            .try_acquire("k", Duration::from_secs(10))
            .await
            .unwrap());
        backend.release("k").await.unwrap();
        assert!(backend
            .try_acquire("k", Duration::from_secs(10))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn expired_lock_is_reacquirable() {
        let backend = InMemoryLockBackend::new();

        assert!(backend
            .try_acquire("k", Duration::from_millis(20))
            .await
            .unwrap());
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(backend
            .try_acquire("k", Duration::from_secs(10))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let backend = InMemoryLockBackend::new();

        assert!(backend
            .try_acquire("a", Duration::from_secs(10))
            .await
            .unwrap());
        assert!(backend
            .try_acquire("b", Duration::from_secs(10))
            .await
            .unwrap());
    }
}
