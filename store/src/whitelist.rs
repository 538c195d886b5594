//! Whitelist entries and their storage trait.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use turnstile_types::{ApprovalStatus, PlayerId, Timestamp};

/// A trusted-player whitelist entry. At most one exists per identity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WhitelistEntry {
    pub identity: PlayerId,
    pub display_name: String,
    pub status: ApprovalStatus,
    pub created_at: Timestamp,
}

impl WhitelistEntry {
    /// Only approved entries bypass verification.
    pub fn is_approved(&self) -> bool {
        self.status == ApprovalStatus::Approved
    }
}

/// Read access to the whitelist table. Written only by the admin subsystem.
pub trait WhitelistStore: Send + Sync {
    /// The entry for an identity, if one exists (identity is a unique key).
    fn entry(&self, identity: &PlayerId) -> Result<Option<WhitelistEntry>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_approved_passes() {
        let mut e = WhitelistEntry {
            identity: PlayerId::parse("STEAM_1:0:11101").unwrap(),
            display_name: "regular".into(),
            status: ApprovalStatus::Approved,
            created_at: Timestamp::EPOCH,
        };
        assert!(e.is_approved());
        e.status = ApprovalStatus::Pending;
        assert!(!e.is_approved());
        e.status = ApprovalStatus::Rejected;
        assert!(!e.is_approved());
    }
}
