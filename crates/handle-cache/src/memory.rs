//! In-memory implementation of the availability cache.
//!
//! Single-process stand-in used by tests and by deployments that run without
//! a shared cache backend. Satisfies the same contract as the Redis set, just
//! without replication.

use crate::{AvailabilityCache, CacheResult};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

/// Availability cache backed by a process-local `HashSet`.
#[derive(Default)]
pub struct InMemoryAvailabilityCache {
    entries: Mutex<HashSet<String>>,
}

impl InMemoryAvailabilityCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AvailabilityCache for InMemoryAvailabilityCache {
    async fn contains(&self, name: &str) -> CacheResult<bool> {
        Ok(self.entries.lock().expect("lock poisoned").contains(name))
    }

    async fn add(&self, name: &str) -> CacheResult<()> {
        self.entries
            .lock()
            .expect("lock poisoned")
            .insert(name.to_string());
        Ok(())
    }

    async fn add_batch(&self, names: &[String]) -> CacheResult<()> {
        let mut entries = self.entries.lock().expect("lock poisoned");
        for name in names {
            entries.insert(name.clone());
        }
        Ok(())
    }

    async fn clear(&self) -> CacheResult<()> {
        self.entries.lock().expect("lock poisoned").clear();
        Ok(())
    }

    async fn count(&self) -> CacheResult<u64> {
        Ok(self.entries.lock().expect("lock poisoned").len() as u64)
    }
}
