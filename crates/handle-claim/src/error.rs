//! Error taxonomy for handle claims.
//!
//! Every terminal state of the claim state machine has exactly one variant,
//! so callers branch on kind instead of matching message strings. Three
//! different detection points (cache hit, in-lock re-check, store constraint
//! violation) all collapse into `AlreadyTaken`.

use crate::StoreError;
use handle_cache::CacheError;
use handle_lock::LockError;
use thiserror::Error;

/// Claim error type.
#[derive(Error, Debug)]
pub enum ClaimError {
    /// Candidate failed length, charset, or reserved-word rules
    #[error("invalid handle format: {0}")]
    InvalidFormat(String),

    /// The account already completed its one-way handle transition
    #[error("handle already set for this account")]
    AlreadySet,

    /// Another claimant holds the lock; transient, retry shortly
    #[error("this handle is being claimed by another user, please try again")]
    LockContention,

    /// Definitive uniqueness conflict
    #[error("this handle is already taken, please try another")]
    AlreadyTaken,

    /// Store, cache, or lock failure with no fallback path
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for claim operations.
pub type ClaimResult<T> = Result<T, ClaimError>;

impl From<StoreError> for ClaimError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::HandleTaken => ClaimError::AlreadyTaken,
            StoreError::NotFound(id) => ClaimError::Internal(format!("account not found: {id}")),
            StoreError::Backend(msg) => ClaimError::Internal(msg),
        }
    }
}

impl From<CacheError> for ClaimError {
    fn from(e: CacheError) -> Self {
        ClaimError::Internal(format!("cache: {e}"))
    }
}

impl From<LockError> for ClaimError {
    fn from(e: LockError) -> Self {
        ClaimError::Internal(format!("lock: {e}"))
    }
}
