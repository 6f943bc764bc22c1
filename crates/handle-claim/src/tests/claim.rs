//! Claim state machine: happy path, one-way transition, contention,
//! conflicts, and lock release on every outcome.

use super::harness::{build, BlindspotStore, FlakyCache};
use crate::{ClaimError, ClaimService};
use handle_cache::AvailabilityCache;
use handle_lock::{InMemoryLockBackend, LockManager};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn claim_round_trip() {
    let deps = build();
    let id = deps.store.add_temp_account("acc_1");

    let account = deps.service.set_username(&id, "alice").await.unwrap();

    assert_eq!(account.handle, "alice");
    assert_eq!(deps.store.handle_of(&id), "alice");
    assert!(!deps.service.check_availability("alice").await.unwrap());
    assert!(deps.cache.contains("alice").await.unwrap());
}

#[tokio::test]
async fn claim_normalizes_the_candidate() {
    let deps = build();
    let id = deps.store.add_temp_account("acc_1");

    let account = deps.service.set_username(&id, "  ALIce ").await.unwrap();

    assert_eq!(account.handle, "alice");
}

#[tokio::test]
async fn second_claim_is_already_set_regardless_of_name() {
    let deps = build();
    let id = deps.store.add_temp_account("acc_1");

    deps.service.set_username(&id, "alice").await.unwrap();

    assert!(matches!(
        deps.service.set_username(&id, "alice").await,
        Err(ClaimError::AlreadySet)
    ));
    assert!(matches!(
        deps.service.set_username(&id, "different").await,
        Err(ClaimError::AlreadySet)
    ));
}

#[tokio::test]
async fn invalid_candidate_is_rejected_before_any_io() {
    let deps = build();
    let id = deps.store.add_temp_account("acc_1");

    assert!(matches!(
        deps.service.set_username(&id, "ab").await,
        Err(ClaimError::InvalidFormat(_))
    ));
    assert_eq!(deps.store.write_count(), 0);
}

#[tokio::test]
async fn taken_handle_is_already_taken() {
    let deps = build();
    deps.store.add_claimed_account("acc_bob", "bob");
    let id = deps.store.add_temp_account("acc_1");

    assert!(matches!(
        deps.service.set_username(&id, "bob").await,
        Err(ClaimError::AlreadyTaken)
    ));
    assert_eq!(deps.store.handle_of(&id), "temp_acc_1");
}

#[tokio::test]
async fn held_lock_means_contention() {
    let deps = build();
    let id = deps.store.add_temp_account("acc_1");

    // Another process holds the claim lock for this handle.
    let other = LockManager::new(
        deps.lock_backend.clone(),
        deps.config.lock_key_prefix.clone(),
        deps.config.lock_ttl,
    );
    let _held = other.acquire("alice").await.unwrap().unwrap();

    assert!(matches!(
        deps.service.set_username(&id, "alice").await,
        Err(ClaimError::LockContention)
    ));
    assert_eq!(deps.store.handle_of(&id), "temp_acc_1");
}

#[tokio::test]
async fn lock_is_released_after_success() {
    let deps = build();
    let id = deps.store.add_temp_account("acc_1");

    deps.service.set_username(&id, "alice").await.unwrap();

    // Immediately re-acquirable: the claim released its lock.
    let locks = LockManager::new(
        deps.lock_backend.clone(),
        deps.config.lock_key_prefix.clone(),
        deps.config.lock_ttl,
    );
    assert!(locks.acquire("alice").await.unwrap().is_some());
}

#[tokio::test]
async fn lock_is_released_after_failure() {
    let deps = build();
    deps.store.add_claimed_account("acc_bob", "bob");
    let id = deps.store.add_temp_account("acc_1");

    let _ = deps.service.set_username(&id, "bob").await;

    let locks = LockManager::new(
        deps.lock_backend.clone(),
        deps.config.lock_key_prefix.clone(),
        deps.config.lock_ttl,
    );
    assert!(locks.acquire("bob").await.unwrap().is_some());
}

#[tokio::test]
async fn constraint_violation_at_write_maps_to_already_taken() {
    let deps = build();
    deps.store.add_claimed_account("acc_bob", "bob");
    let id = deps.store.add_temp_account("acc_1");

    // A store whose lookup misses "bob" simulates the narrow window where
    // two claimants both pass the in-lock re-check: the write races straight
    // into the unique constraint and loses.
    let blind = Arc::new(BlindspotStore {
        inner: deps.store.clone(),
        hidden_handle: "bob".to_string(),
    });
    let cache = Arc::new(FlakyCache::new());
    let locks = LockManager::new(
        Arc::new(InMemoryLockBackend::new()),
        deps.config.lock_key_prefix.clone(),
        Duration::from_secs(10),
    );
    let service = ClaimService::new(blind, Some(cache), Some(locks), deps.config.clone());

    assert!(matches!(
        service.set_username(&id, "bob").await,
        Err(ClaimError::AlreadyTaken)
    ));
    assert_eq!(deps.store.handle_of(&id), "temp_acc_1");
}

#[tokio::test]
async fn cache_outage_does_not_block_a_claim() {
    let deps = build();
    let id = deps.store.add_temp_account("acc_1");
    deps.cache.set_failing(true);

    // The availability re-check falls back to the store and the post-write
    // cache add fails silently; the claim itself must still commit.
    let account = deps.service.set_username(&id, "alice").await.unwrap();
    assert_eq!(account.handle, "alice");
}

#[tokio::test]
async fn unknown_account_is_internal() {
    let deps = build();
    let id = crate::AccountId::new("missing");

    assert!(matches!(
        deps.service.set_username(&id, "alice").await,
        Err(ClaimError::Internal(_))
    ));
}

#[tokio::test]
async fn store_only_claim_relies_on_the_constraint() {
    let (store, service) = super::harness::build_store_only();
    store.add_claimed_account("acc_bob", "bob");
    let id = store.add_temp_account("acc_1");

    assert!(matches!(
        service.set_username(&id, "bob").await,
        Err(ClaimError::AlreadyTaken)
    ));

    let account = service.set_username(&id, "alice").await.unwrap();
    assert_eq!(account.handle, "alice");
}
