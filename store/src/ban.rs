//! Ban records and their storage trait.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use turnstile_types::{BanScope, BanStatus, PlayerId, Timestamp};

/// How long a ban lasts, as specified by the administrator.
///
/// The absolute expiry is computed once at creation and stored on the entry;
/// enforcement only ever consults [`BanEntry::expires_at`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BanDuration {
    Permanent,
    /// Lapses after this many seconds.
    Seconds(u64),
}

/// A single ban record.
///
/// Multiple bans may exist for the same identity; enforcement takes the
/// union, so any one enforceable entry denies the connection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BanEntry {
    pub identity: PlayerId,
    /// Address the ban targets (always consulted for `BanScope::Ip`).
    pub address: Option<IpAddr>,
    pub scope: BanScope,
    pub reason: Option<String>,
    pub duration: BanDuration,
    pub status: BanStatus,
    pub created_at: Timestamp,
    /// Absolute expiry; `None` means the ban never lapses on its own.
    pub expires_at: Option<Timestamp>,
}

impl BanEntry {
    /// Whether this ban currently denies a connection.
    ///
    /// Enforceable iff status is `Active` and the expiry, if any, has not
    /// passed. An `expires_at` exactly equal to `now` counts as lapsed.
    pub fn is_enforceable(&self, now: Timestamp) -> bool {
        self.status == BanStatus::Active
            && match self.expires_at {
                None => true,
                Some(expiry) => now < expiry,
            }
    }

    /// The reason shown in a deny verdict when none was recorded.
    pub fn display_reason(&self) -> &str {
        self.reason.as_deref().unwrap_or("banned")
    }
}

/// Read access to the ban table. Written only by the admin subsystem.
pub trait BanStore: Send + Sync {
    /// All bans recorded against an identity, any status.
    fn bans_for_identity(&self, identity: &PlayerId) -> Result<Vec<BanEntry>, StoreError>;

    /// All bans recorded against a network address, any status.
    fn bans_for_address(&self, address: &IpAddr) -> Result<Vec<BanEntry>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ban(status: BanStatus, expires_at: Option<Timestamp>) -> BanEntry {
        BanEntry {
            identity: PlayerId::parse("STEAM_1:0:11101").unwrap(),
            address: None,
            scope: BanScope::Account,
            reason: Some("aim assistance".into()),
            duration: BanDuration::Permanent,
            status,
            created_at: Timestamp::new(1_000),
            expires_at,
        }
    }

    #[test]
    fn active_permanent_ban_is_enforceable() {
        assert!(ban(BanStatus::Active, None).is_enforceable(Timestamp::new(9_999_999)));
    }

    #[test]
    fn lifted_and_expired_statuses_never_enforce() {
        let now = Timestamp::new(2_000);
        assert!(!ban(BanStatus::Unbanned, None).is_enforceable(now));
        assert!(!ban(BanStatus::Expired, None).is_enforceable(now));
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let b = ban(BanStatus::Active, Some(Timestamp::new(5_000)));
        assert!(b.is_enforceable(Timestamp::new(4_999)));
        assert!(!b.is_enforceable(Timestamp::new(5_000)));
        assert!(!b.is_enforceable(Timestamp::new(5_001)));
    }

    #[test]
    fn display_reason_falls_back() {
        let mut b = ban(BanStatus::Active, None);
        assert_eq!(b.display_reason(), "aim assistance");
        b.reason = None;
        assert_eq!(b.display_reason(), "banned");
    }
}
