//! Account types shared across the authoritative store seam.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque account identifier issued by the authoritative store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Account record as seen by this subsystem: identity plus handle.
///
/// Accounts start life with a temporary placeholder handle and complete
/// exactly one transition to a permanent one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub handle: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Whether the handle still carries the onboarding placeholder prefix,
    /// i.e. the one-way claim transition has not happened yet.
    pub fn has_temporary_handle(&self, temp_prefix: &str) -> bool {
        self.handle.starts_with(temp_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(handle: &str) -> Account {
        Account {
            id: AccountId::new("acc_1"),
            handle: handle.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn temporary_handle_detection() {
        assert!(account("temp_acc_1").has_temporary_handle("temp_"));
        assert!(!account("alice").has_temporary_handle("temp_"));
        // A permanent handle that merely contains the prefix is permanent.
        assert!(!account("my_temp_name").has_temporary_handle("temp_"));
    }

    #[test]
    fn account_id_display() {
        assert_eq!(AccountId::new("acc_9").to_string(), "acc_9");
        assert_eq!(AccountId::from("acc_9").as_str(), "acc_9");
    }
}
