//! Authoritative store seam.
//!
//! The account store is an external collaborator and the sole correctness
//! arbiter: its uniqueness constraint on the handle column decides every race
//! the cache and lock layers fail to prevent.

use crate::{Account, AccountId};
use async_trait::async_trait;
use thiserror::Error;

/// Authoritative store error type.
///
/// `HandleTaken` is distinguished from other backend failures because the
/// claim path maps it to a definitive "already taken" outcome rather than an
/// internal error.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The uniqueness constraint on the handle column rejected a write
    #[error("handle already taken")]
    HandleTaken,

    /// No account with the given id
    #[error("account not found: {0}")]
    NotFound(String),

    /// Any other store failure
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Durable account storage with a uniqueness constraint on the handle.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Look up an account by its normalized handle.
    async fn lookup_by_handle(&self, handle: &str) -> StoreResult<Option<Account>>;

    /// Fetch an account by id. `NotFound` if it does not exist.
    async fn get_by_id(&self, id: &AccountId) -> StoreResult<Account>;

    /// Atomically set the account's handle.
    ///
    /// Returns `HandleTaken` when the uniqueness constraint rejects the
    /// write — the final race loser's signal.
    async fn update_handle(&self, id: &AccountId, handle: &str) -> StoreResult<Account>;

    /// Number of accounts holding a permanent (non-temporary) handle.
    async fn count_permanent(&self) -> StoreResult<u64>;

    /// Every permanent handle, without loading full account records.
    async fn list_permanent_handles(&self) -> StoreResult<Vec<String>>;
}
