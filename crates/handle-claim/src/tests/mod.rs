//! Service-level tests for the claim subsystem.
//!
//! Covered properties:
//! - Availability checks are pure reads with at most a best-effort cache warm
//! - Cache outages degrade to store-only verification, never a false "available"
//! - Exactly one of N concurrent claimants for one handle ever succeeds
//! - The claim transition is one-way per account
//! - Seeder reconciliation converges on the store's permanent handle set

mod claim;
