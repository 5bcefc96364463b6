//! Advisory lock metadata for state backends
//!
//! A lock guards a state file against concurrent apply/destroy runs. It
//! records enough about the holder (who, which talus version, until when)
//! for another operator to decide whether a force-unlock is safe.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default lock timeout in seconds (15 minutes)
pub const DEFAULT_LOCK_TIMEOUT_SECS: i64 = 900;

/// Metadata describing who holds a state lock and why
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// Unique identifier for this lock
    pub id: String,
    /// The operation being performed (e.g., "apply", "destroy")
    pub operation: String,
    /// Who acquired the lock (username@hostname)
    pub who: String,
    /// The talus version that took the lock
    pub talus_version: String,
    /// When the lock was created
    pub created: DateTime<Utc>,
    /// When the lock expires and may be taken over
    pub expires: DateTime<Utc>,
}

impl LockInfo {
    /// Create a new lock for an operation
    pub fn new(operation: impl Into<String>) -> Self {
        Self::with_timeout(operation, DEFAULT_LOCK_TIMEOUT_SECS)
    }

    /// Create a new lock with a custom timeout
    pub fn with_timeout(operation: impl Into<String>, timeout_secs: i64) -> Self {
        let now = Utc::now();

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            operation: operation.into(),
            who: holder_identity(),
            talus_version: env!("CARGO_PKG_VERSION").to_string(),
            created: now,
            expires: now + Duration::seconds(timeout_secs),
        }
    }

    /// A stale lock may be taken over by the next acquirer
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires
    }

    /// Time left until the lock goes stale
    pub fn time_remaining(&self) -> Duration {
        self.expires - Utc::now()
    }
}

/// username@hostname of the process taking the lock
fn holder_identity() -> String {
    let username = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let hostname = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string());

    format!("{}@{}", username, hostname)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_lock_is_fresh() {
        let lock = LockInfo::new("apply");
        assert_eq!(lock.operation, "apply");
        assert!(!lock.id.is_empty());
        assert!(!lock.is_expired());
        assert!(lock.expires > lock.created);
    }

    #[test]
    fn lock_records_holder_and_version() {
        let lock = LockInfo::new("destroy");
        assert!(lock.who.contains('@'));
        assert_eq!(lock.talus_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn custom_timeout_bounds_remaining_time() {
        let lock = LockInfo::with_timeout("apply", 60);
        let remaining = lock.time_remaining();
        assert!(remaining.num_seconds() > 55);
        assert!(remaining.num_seconds() <= 60);
    }

    #[test]
    fn expired_lock_detected() {
        let lock = LockInfo::with_timeout("apply", -1);
        assert!(lock.is_expired());
    }

    #[test]
    fn lock_round_trips_through_json() {
        let lock = LockInfo::new("apply");
        let json = serde_json::to_string_pretty(&lock).unwrap();
        let deserialized: LockInfo = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.id, lock.id);
        assert_eq!(deserialized.operation, lock.operation);
        assert_eq!(deserialized.who, lock.who);
        assert_eq!(deserialized.talus_version, lock.talus_version);
    }
}
