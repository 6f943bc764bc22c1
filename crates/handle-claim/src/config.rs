//! Configuration for the claim subsystem.

use std::collections::HashSet;
use std::time::Duration;

/// Handles rejected regardless of format validity.
const DEFAULT_RESERVED: &[&str] = &[
    "admin",
    "root",
    "system",
    "moderator",
    "support",
    "help",
    "api",
    "null",
    "undefined",
    "www",
];

/// Configuration for [`ClaimService`](crate::ClaimService) and
/// [`Seeder`](crate::Seeder) instances.
///
/// Key names, TTLs, length bounds and the reserved-word table all live here
/// rather than in package-level state, so isolated instances (one per test,
/// one per namespace) cannot interfere.
#[derive(Debug, Clone)]
pub struct ClaimConfig {
    /// Redis set key mirroring all claimed handles.
    pub set_key: String,
    /// Prefix for per-handle lock keys.
    pub lock_key_prefix: String,
    /// TTL on claim locks; bounds staleness when release never runs.
    pub lock_ttl: Duration,
    /// Prefix marking a handle as a not-yet-claimed onboarding placeholder.
    pub temp_handle_prefix: String,
    /// Inclusive minimum candidate length.
    pub min_length: usize,
    /// Inclusive maximum candidate length.
    pub max_length: usize,
    /// Lower-cased words that can never be claimed as handles.
    pub reserved: HashSet<String>,
    /// Handles per cache command during a reseed.
    pub seed_batch_size: usize,
}

impl Default for ClaimConfig {
    fn default() -> Self {
        Self {
            set_key: "handles:set".to_string(),
            lock_key_prefix: "handle:lock:".to_string(),
            lock_ttl: Duration::from_secs(10),
            temp_handle_prefix: "temp_".to_string(),
            min_length: 3,
            max_length: 20,
            reserved: DEFAULT_RESERVED.iter().map(|w| w.to_string()).collect(),
            seed_batch_size: 1000,
        }
    }
}

impl ClaimConfig {
    /// Default configuration with environment overrides.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(key) = std::env::var("HANDLE_SET_KEY") {
            config.set_key = key;
        }
        if let Ok(prefix) = std::env::var("HANDLE_LOCK_PREFIX") {
            config.lock_key_prefix = prefix;
        }
        if let Some(secs) = std::env::var("HANDLE_LOCK_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.lock_ttl = Duration::from_secs(secs);
        }
        if let Some(size) = std::env::var("HANDLE_SEED_BATCH_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.seed_batch_size = size;
        }

        config
    }

    /// Extend the reserved-word set with deployment-specific entries.
    ///
    /// Entries are lower-cased, matching the normalization applied to
    /// candidates.
    pub fn with_reserved<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.reserved
            .extend(words.into_iter().map(|w| w.as_ref().to_ascii_lowercase()));
        self
    }
}
