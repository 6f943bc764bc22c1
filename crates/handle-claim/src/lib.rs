//! Handle claiming: global uniqueness for human-chosen usernames.
//!
//! Multiple server processes concurrently answer "is this handle free?" and
//! "claim this handle for this account" against one authoritative store,
//! with a shared availability cache keeping the common case off the store.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐      ┌──────────────┐      ┌─────────────────┐
//! │  Caller  │─────▶│ ClaimService │─────▶│ AccountStore    │
//! └──────────┘      │              │      │ (unique handle) │
//!                   │  fast path   │      └─────────────────┘
//!                   ▼              ▼               ▲
//!          ┌────────────────┐ ┌───────────┐       │
//!          │ Availability   │ │ Lock      │   ┌────────┐
//!          │ Cache (set)    │ │ Manager   │   │ Seeder │
//!          └────────────────┘ └───────────┘   └────────┘
//! ```
//!
//! # Core Invariants
//!
//! 1. **Store decides**: at most one handle-write ever commits per normalized
//!    name; the store's uniqueness constraint is the only hard guarantee.
//! 2. **Cache never lies positive**: every cache entry was confirmed claimed
//!    at insertion time. Misses and cache outages fall back to the store.
//! 3. **One-way transition**: an account claims a permanent handle exactly
//!    once; the temporary onboarding handle never comes back.
//! 4. **Locks are advisory**: the claim lock narrows the race window and
//!    improves the failure message, nothing more. TTL bounds abandonment.
//!
//! # Example
//!
//! ```ignore
//! use handle_claim::{ClaimConfig, ClaimService, Seeder};
//!
//! let config = ClaimConfig::default();
//! let service = ClaimService::new(store, Some(cache.clone()), Some(locks), config.clone());
//!
//! if service.check_availability("alice").await? {
//!     let account = service.set_username(&account_id, "alice").await?;
//! }
//! ```

mod account;
mod config;
mod error;
mod seeder;
mod service;
mod store;
mod validate;

#[cfg(test)]
mod tests;

pub use account::{Account, AccountId};
pub use config::ClaimConfig;
pub use error::{ClaimError, ClaimResult};
pub use seeder::Seeder;
pub use service::ClaimService;
pub use store::{AccountStore, StoreError, StoreResult};
pub use validate::{normalize, validate};
