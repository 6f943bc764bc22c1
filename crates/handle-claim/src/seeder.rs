//! Cache reconciliation against the authoritative store.

use crate::{AccountStore, ClaimConfig, ClaimError, ClaimResult};
use handle_cache::AvailabilityCache;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Rebuilds the availability cache from the authoritative store.
///
/// The cache is disposable: a reseed clears it and reloads every permanent
/// handle in fixed-size batches. Runs at process startup (non-blocking, via
/// [`Seeder::spawn_seed_if_needed`]) and on operator demand at any time.
pub struct Seeder {
    store: Arc<dyn AccountStore>,
    cache: Arc<dyn AvailabilityCache>,
    batch_size: usize,
}

impl Seeder {
    pub fn new(
        store: Arc<dyn AccountStore>,
        cache: Arc<dyn AvailabilityCache>,
        config: &ClaimConfig,
    ) -> Self {
        Self {
            store,
            cache,
            batch_size: config.seed_batch_size,
        }
    }

    /// Reseed only if the cache has drifted from the store.
    ///
    /// Drift detection compares cardinalities. A failed cache count is
    /// itself treated as drift: reseeding is idempotent and a broken count
    /// is a reason to rebuild, never to skip.
    pub async fn seed_if_needed(&self) -> ClaimResult<()> {
        let started = Instant::now();

        let cache_count = match self.cache.count().await {
            Ok(count) => Some(count),
            Err(e) => {
                warn!(error = %e, "Failed to read cache count, will reseed");
                None
            }
        };

        let store_count = self
            .store
            .count_permanent()
            .await
            .map_err(|e| ClaimError::Internal(format!("failed to count accounts: {e}")))?;

        if cache_count == Some(store_count) {
            info!(count = store_count, "Handle cache is up to date, skipping seed");
            return Ok(());
        }

        info!(
            cache_count = cache_count.unwrap_or(0),
            store_count, "Handle counts differ, reseeding"
        );

        self.reseed().await?;

        info!(
            total = store_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Handle seeding completed"
        );

        Ok(())
    }

    /// Full rebuild: fetch every permanent handle, clear the cache, re-add
    /// in fixed-size batches.
    ///
    /// A batch failure aborts with the batch index and total for diagnosis.
    /// Batches already applied stay in place; re-running re-adds the same
    /// members and converges.
    pub async fn reseed(&self) -> ClaimResult<()> {
        let handles = self
            .store
            .list_permanent_handles()
            .await
            .map_err(|e| ClaimError::Internal(format!("failed to list handles: {e}")))?;

        info!(count = handles.len(), "Fetched permanent handles from store");

        // Clear before reload so stale members cannot over-report. A failed
        // clear is logged and the reload proceeds; SADD is idempotent.
        if let Err(e) = self.cache.clear().await {
            warn!(error = %e, "Failed to clear handle cache before reseed, continuing");
        }

        if handles.is_empty() {
            info!("No handles to seed");
            return Ok(());
        }

        let total_batches = handles.len().div_ceil(self.batch_size);

        for (index, batch) in handles.chunks(self.batch_size).enumerate() {
            let batch_num = index + 1;

            self.cache.add_batch(batch).await.map_err(|e| {
                ClaimError::Internal(format!(
                    "failed to add handle batch {batch_num}/{total_batches}: {e}"
                ))
            })?;

            debug!(
                batch = batch_num,
                total_batches,
                batch_size = batch.len(),
                "Seeded handle batch"
            );
        }

        Ok(())
    }

    /// Cache cardinality, for operator tooling and drift inspection.
    pub async fn cache_count(&self) -> ClaimResult<u64> {
        Ok(self.cache.count().await?)
    }

    /// Drop every cache entry without rebuilding. Subsequent checks fall
    /// back to the store and re-warm lazily, or an operator reseeds.
    pub async fn clear_cache(&self) -> ClaimResult<()> {
        Ok(self.cache.clear().await?)
    }

    /// Run [`Seeder::seed_if_needed`] in the background so process startup
    /// never blocks on cache reconciliation.
    pub fn spawn_seed_if_needed(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(e) = self.seed_if_needed().await {
                error!(error = %e, "Startup handle seeding failed");
            }
        })
    }
}
