//! Verification records and their storage trait.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use turnstile_types::{PlayerId, ProfileAttributes, Timestamp, VerificationStatus};

/// The cached verification state for one identity (unique key).
///
/// Attributes are populated only once a fetch has completed, i.e. never
/// while the status is `Pending`. `updated_at` is bumped on every status or
/// attribute change and never moves backwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub identity: PlayerId,
    pub display_name: Option<String>,
    /// Address the identity was last seen connecting from.
    pub last_address: Option<IpAddr>,
    pub status: VerificationStatus,
    /// Why the terminal verdict was reached (policy text or admin note).
    pub reason: Option<String>,
    pub attributes: Option<ProfileAttributes>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl VerificationRecord {
    /// A fresh pending record for an identity first seen at `now`.
    pub fn pending(identity: PlayerId, now: Timestamp) -> Self {
        Self {
            identity,
            display_name: None,
            last_address: None,
            status: VerificationStatus::Pending,
            reason: None,
            attributes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a terminal record has outlived the verdict TTL.
    /// Non-terminal records are never "stale" in the serve-stale sense.
    pub fn is_stale(&self, ttl_secs: u64, now: Timestamp) -> bool {
        self.status.is_terminal() && self.updated_at.older_than(ttl_secs, now)
    }

    /// Whether a refresh may act on this record at `now`: terminal or
    /// verified records past the TTL, or a pending record older than the
    /// retry bound (a fetch that died without completing).
    pub fn refresh_due(&self, ttl_secs: u64, pending_retry_secs: u64, now: Timestamp) -> bool {
        match self.status {
            VerificationStatus::Pending => self.updated_at.older_than(pending_retry_secs, now),
            _ => self.updated_at.older_than(ttl_secs, now),
        }
    }
}

/// Storage for verification records. The verification cache is the sole
/// writer; the admin subsystem may read.
pub trait VerificationStore: Send + Sync {
    fn get(&self, identity: &PlayerId) -> Result<Option<VerificationRecord>, StoreError>;

    /// Insert or replace the record for `record.identity`.
    fn put(&self, record: &VerificationRecord) -> Result<(), StoreError>;

    /// Remove the record, returning the identity to the absent state.
    /// Removing a missing record is a no-op.
    fn delete(&self, identity: &PlayerId) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: VerificationStatus, updated_at: u64) -> VerificationRecord {
        VerificationRecord {
            status,
            updated_at: Timestamp::new(updated_at),
            ..VerificationRecord::pending(
                PlayerId::parse("STEAM_1:0:11101").unwrap(),
                Timestamp::new(updated_at),
            )
        }
    }

    #[test]
    fn pending_constructor_shape() {
        let r = VerificationRecord::pending(
            PlayerId::parse("STEAM_1:0:11101").unwrap(),
            Timestamp::new(7),
        );
        assert_eq!(r.status, VerificationStatus::Pending);
        assert!(r.attributes.is_none());
        assert_eq!(r.created_at, r.updated_at);
    }

    #[test]
    fn only_terminal_records_go_stale() {
        let now = Timestamp::new(10_000);
        assert!(record(VerificationStatus::Denied, 0).is_stale(600, now));
        assert!(!record(VerificationStatus::Denied, 9_500).is_stale(600, now));
        assert!(!record(VerificationStatus::Pending, 0).is_stale(600, now));
        assert!(!record(VerificationStatus::Verified, 0).is_stale(600, now));
    }

    #[test]
    fn refresh_due_uses_the_right_window() {
        let now = Timestamp::new(10_000);
        // Pending uses the retry bound.
        assert!(record(VerificationStatus::Pending, 9_800).refresh_due(600, 120, now));
        assert!(!record(VerificationStatus::Pending, 9_950).refresh_due(600, 120, now));
        // Verified and terminal use the TTL.
        assert!(record(VerificationStatus::Verified, 9_000).refresh_due(600, 120, now));
        assert!(!record(VerificationStatus::Allowed, 9_800).refresh_due(600, 120, now));
    }
}
