//! Candidate normalization and format rules.
//!
//! Pure functions, no I/O: length bounds, charset, and the reserved-word
//! table from [`ClaimConfig`].

use crate::{ClaimConfig, ClaimError, ClaimResult};

/// Lower-case and trim a candidate before validation or any backend call.
pub fn normalize(candidate: &str) -> String {
    candidate.trim().to_ascii_lowercase()
}

/// Check format and reserved-word rules for an already-normalized handle.
pub fn validate(config: &ClaimConfig, handle: &str) -> ClaimResult<()> {
    if handle.len() < config.min_length || handle.len() > config.max_length {
        return Err(ClaimError::InvalidFormat(format!(
            "handle must be {}-{} characters",
            config.min_length, config.max_length
        )));
    }

    if !handle.chars().all(is_allowed_char) {
        return Err(ClaimError::InvalidFormat(
            "handle may only contain letters, numbers, underscores, and hyphens".to_string(),
        ));
    }

    if config.reserved.contains(handle) {
        return Err(ClaimError::InvalidFormat(
            "this handle is reserved".to_string(),
        ));
    }

    Ok(())
}

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}
