//! Claim orchestration: availability checks and the claim state machine.

use crate::{
    normalize, validate, Account, AccountId, AccountStore, ClaimConfig, ClaimError, ClaimResult,
    StoreError,
};
use handle_cache::AvailabilityCache;
use handle_lock::LockManager;
use std::sync::Arc;
use tracing::{info, warn};

/// Orchestrates validator, availability cache, lock manager, and the
/// authoritative store.
///
/// The cache and lock manager are optional: without them the service runs
/// store-only and relies entirely on the store's uniqueness constraint,
/// which is also how it behaves when the cache backend is down.
pub struct ClaimService {
    store: Arc<dyn AccountStore>,
    cache: Option<Arc<dyn AvailabilityCache>>,
    locks: Option<LockManager>,
    config: ClaimConfig,
}

impl ClaimService {
    pub fn new(
        store: Arc<dyn AccountStore>,
        cache: Option<Arc<dyn AvailabilityCache>>,
        locks: Option<LockManager>,
        config: ClaimConfig,
    ) -> Self {
        Self {
            store,
            cache,
            locks,
            config,
        }
    }

    /// Whether `candidate` can currently be claimed.
    ///
    /// Fast path is the cache; a miss or a cache failure falls back to the
    /// authoritative store. Never mutates the store; at most warms the cache
    /// when drift is detected.
    pub async fn check_availability(&self, candidate: &str) -> ClaimResult<bool> {
        let handle = normalize(candidate);
        validate(&self.config, &handle)?;

        self.is_available(&handle).await
    }

    /// Claim `candidate` as the permanent handle of `account_id`.
    ///
    /// State machine: validate, reject accounts past their one-way
    /// transition, narrow the race with an advisory lock, re-check
    /// availability inside the lock, then write. A uniqueness-constraint
    /// violation at write time is the final race loser and maps to
    /// [`ClaimError::AlreadyTaken`]. The cache add after a successful write
    /// is a side effect that never changes the outcome.
    pub async fn set_username(
        &self,
        account_id: &AccountId,
        candidate: &str,
    ) -> ClaimResult<Account> {
        let handle = normalize(candidate);
        validate(&self.config, &handle)?;

        let account = self.store.get_by_id(account_id).await?;
        if !account.has_temporary_handle(&self.config.temp_handle_prefix) {
            return Err(ClaimError::AlreadySet);
        }

        let guard = match &self.locks {
            Some(locks) => match locks.acquire(&handle).await? {
                Some(guard) => Some(guard),
                None => return Err(ClaimError::LockContention),
            },
            None => None,
        };

        let result = self.claim_locked(account_id, &handle).await;

        // Deterministic release on both outcomes; the guard's drop backstop
        // and the TTL cover paths that never reach here.
        if let Some(guard) = guard {
            guard.release().await;
        }

        result
    }

    /// The steps that run while the advisory lock is held.
    async fn claim_locked(&self, account_id: &AccountId, handle: &str) -> ClaimResult<Account> {
        // Re-check inside the lock: closes the window between the caller's
        // availability check and this write. Two claimants can still both
        // pass here; the store constraint picks the winner.
        if !self.is_available(handle).await? {
            return Err(ClaimError::AlreadyTaken);
        }

        let updated = match self.store.update_handle(account_id, handle).await {
            Ok(account) => account,
            Err(StoreError::HandleTaken) => return Err(ClaimError::AlreadyTaken),
            Err(e) => return Err(e.into()),
        };

        info!(account_id = %account_id, handle = %handle, "Handle claimed");

        self.warm_cache(handle).await;

        Ok(updated)
    }

    /// Cache-aside availability test for an already-validated handle.
    async fn is_available(&self, handle: &str) -> ClaimResult<bool> {
        if let Some(cache) = &self.cache {
            match cache.contains(handle).await {
                // A positive cache answer is authoritative.
                Ok(true) => return Ok(false),
                // Negative means unknown; verify against the store.
                Ok(false) => {}
                Err(e) => {
                    warn!(handle = %handle, error = %e, "Cache check failed, falling back to store");
                }
            }
        }

        let existing = self.store.lookup_by_handle(handle).await?;

        if existing.is_some() {
            // Drift: the store knows this handle but the cache missed it.
            self.warm_cache(handle).await;
            return Ok(false);
        }

        Ok(true)
    }

    /// Best-effort cache insert. Failures are logged and swallowed: the
    /// cache may under-report but the store stays correct either way.
    async fn warm_cache(&self, handle: &str) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.add(handle).await {
                warn!(handle = %handle, error = %e, "Failed to add handle to cache");
            }
        }
    }
}
